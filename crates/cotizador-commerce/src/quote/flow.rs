//! Quote page flow: cart review, contact form, confirmation.

use chrono::{DateTime, Local};
use cotizador_cache::Backend;
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::quote::{QuoteReference, QuoteRequest, QuoteStore};

/// Steps of the quote page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStep {
    /// Reviewing cart lines.
    #[default]
    Cart,
    /// Filling in contact and delivery data.
    Form,
    /// Request sent.
    Success,
}

impl QuoteStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStep::Cart => "cart",
            QuoteStep::Form => "form",
            QuoteStep::Success => "success",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            QuoteStep::Cart => "Productos",
            QuoteStep::Form => "Datos de contacto",
            QuoteStep::Success => "Solicitud enviada",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            QuoteStep::Cart => 1,
            QuoteStep::Form => 2,
            QuoteStep::Success => 3,
        }
    }
}

/// What the customer sees after a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteConfirmation {
    pub reference: QuoteReference,
    pub request: QuoteRequest,
    pub submitted_at: DateTime<Local>,
}

/// Quote page state machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteFlow {
    step: QuoteStep,
    confirmation: Option<QuoteConfirmation>,
}

impl QuoteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> QuoteStep {
        self.step
    }

    /// The last successful submission, if the flow reached
    /// [`QuoteStep::Success`].
    pub fn confirmation(&self) -> Option<&QuoteConfirmation> {
        self.confirmation.as_ref()
    }

    /// Move from the cart to the form. The cart must not be empty.
    pub fn advance<B: Backend>(&mut self, store: &QuoteStore<B>) -> Result<QuoteStep, CommerceError> {
        match self.step {
            QuoteStep::Cart if store.is_empty() => Err(CommerceError::EmptyQuote),
            QuoteStep::Cart => {
                self.step = QuoteStep::Form;
                Ok(self.step)
            }
            other => Err(transition(other, "next")),
        }
    }

    /// Return from the form to the cart.
    pub fn go_back(&mut self) -> Result<QuoteStep, CommerceError> {
        match self.step {
            QuoteStep::Form => {
                self.step = QuoteStep::Cart;
                Ok(self.step)
            }
            other => Err(transition(other, "previous")),
        }
    }

    /// Validate and send the request from the form step.
    ///
    /// On success the flow moves to [`QuoteStep::Success`] holding a fresh
    /// reference code. The cart itself is left untouched; clearing it is the
    /// caller's decision.
    pub fn submit(&mut self, request: QuoteRequest) -> Result<&QuoteConfirmation, CommerceError> {
        if self.step != QuoteStep::Form {
            return Err(transition(self.step, QuoteStep::Success.as_str()));
        }
        request.validate()?;

        let confirmation = QuoteConfirmation {
            reference: QuoteReference::generate(),
            request,
            submitted_at: Local::now(),
        };
        tracing::info!(
            reference = %confirmation.reference,
            lines = confirmation.request.items.len(),
            units = confirmation.request.total_units(),
            company = %confirmation.request.client.company,
            "quote request submitted"
        );

        self.step = QuoteStep::Success;
        Ok(self.confirmation.insert(confirmation))
    }

    /// Start over from the cart step.
    pub fn reset(&mut self) {
        self.step = QuoteStep::Cart;
        self.confirmation = None;
    }
}

fn transition(from: QuoteStep, to: &str) -> CommerceError {
    CommerceError::InvalidTransition {
        from: from.as_str().to_string(),
        to: to.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::quote::{ClientInfo, DeliveryInfo, Region};
    use cotizador_cache::{Cache, MemoryBackend};

    fn filled_store() -> QuoteStore<MemoryBackend> {
        let mut store = QuoteStore::open(Cache::new(MemoryBackend::new()));
        store.add_item(&Catalog::builtin().products()[1], 4);
        store
    }

    fn request(store: &QuoteStore<MemoryBackend>) -> QuoteRequest {
        let client = ClientInfo {
            name: "Pedro Soto".to_string(),
            company: "Planta Concentradora Norte".to_string(),
            email: "psoto@pcn.cl".to_string(),
            phone: "552 123 456".to_string(),
            ..Default::default()
        };
        let delivery = DeliveryInfo {
            address: "Av. Industrial 400".to_string(),
            city: "Antofagasta".to_string(),
            region: Some(Region::Antofagasta),
            requested_date: None,
        };
        QuoteRequest::from_store(store, client, delivery)
    }

    #[test]
    fn test_flow_starts_at_cart() {
        let flow = QuoteFlow::new();
        assert_eq!(flow.step(), QuoteStep::Cart);
        assert!(flow.confirmation().is_none());
    }

    #[test]
    fn test_cannot_advance_with_empty_cart() {
        let store = QuoteStore::open(Cache::new(MemoryBackend::new()));
        let mut flow = QuoteFlow::new();
        assert!(matches!(flow.advance(&store), Err(CommerceError::EmptyQuote)));
        assert_eq!(flow.step(), QuoteStep::Cart);
    }

    #[test]
    fn test_full_flow() {
        let store = filled_store();
        let mut flow = QuoteFlow::new();

        assert_eq!(flow.advance(&store).unwrap(), QuoteStep::Form);
        assert_eq!(flow.go_back().unwrap(), QuoteStep::Cart);
        flow.advance(&store).unwrap();

        let reference = flow.submit(request(&store)).unwrap().reference;
        assert_eq!(flow.step(), QuoteStep::Success);
        assert_eq!(flow.confirmation().unwrap().reference, reference);
        assert_eq!(flow.confirmation().unwrap().request.total_units(), 4);
        assert!(!store.is_empty());

        assert!(flow.advance(&store).is_err());
        assert!(flow.go_back().is_err());

        flow.reset();
        assert_eq!(flow.step(), QuoteStep::Cart);
        assert!(flow.confirmation().is_none());
    }

    #[test]
    fn test_submit_requires_form_step() {
        let store = filled_store();
        let mut flow = QuoteFlow::new();
        assert!(matches!(
            flow.submit(request(&store)),
            Err(CommerceError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_invalid_submission_stays_on_form() {
        let store = filled_store();
        let mut flow = QuoteFlow::new();
        flow.advance(&store).unwrap();

        let mut req = request(&store);
        req.client.email = "psoto".to_string();
        assert!(matches!(flow.submit(req), Err(CommerceError::InvalidEmail(_))));
        assert_eq!(flow.step(), QuoteStep::Form);
        assert!(flow.confirmation().is_none());
    }
}
