//! Quote cart, request, and submission flow.

mod flow;
mod item;
mod reference;
mod request;
mod store;

pub use flow::{QuoteConfirmation, QuoteFlow, QuoteStep};
pub use item::{QuoteItem, Urgency};
pub use reference::QuoteReference;
pub use request::{ClientInfo, DeliveryInfo, QuoteRequest, Region};
pub use store::{Hydration, QuoteStore, QuoteSummary, SubscriptionId, QUOTE_STORAGE_KEY};
