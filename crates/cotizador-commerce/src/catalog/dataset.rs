//! Built-in mill spare parts dataset.

use crate::catalog::{Category, Product};
use crate::ids::{CategoryId, ProductId};

const IMG_LINER: &str =
    "https://images.unsplash.com/photo-1504328345606-18bbc8c9d7d1?w=800&h=600&fit=crop";
const IMG_PLANT: &str =
    "https://images.unsplash.com/photo-1581092160562-40aa08e78837?w=800&h=600&fit=crop";
const IMG_BOLT: &str =
    "https://images.unsplash.com/photo-1572981779307-38b8cabb2407?w=800&h=600&fit=crop";
const IMG_LIFTER: &str =
    "https://images.unsplash.com/photo-1565793298595-6a879b1d9492?w=800&h=600&fit=crop";
const IMG_GEAR: &str =
    "https://images.unsplash.com/photo-1537462715879-360eeb61a0ad?w=800&h=600&fit=crop";
const IMG_SEAL: &str =
    "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=800&h=600&fit=crop";

/// Thumbnail variant of a product image URL.
fn thumb(url: &str) -> String {
    url.replace("w=800&h=600", "w=400&h=300")
}

pub(crate) fn categories() -> Vec<Category> {
    vec![
        Category::new(CategoryId::new(1), "revestimientos", "Revestimientos")
            .with_description("Revestimientos para molinos SAC de alta resistencia")
            .with_image(thumb(IMG_LINER))
            .with_product_count(24),
        Category::new(CategoryId::new(2), "pernos-fijaciones", "Pernos y Fijaciones")
            .with_description("Pernos de alta resistencia y sistemas de fijación")
            .with_image(thumb(IMG_BOLT))
            .with_product_count(18),
        Category::new(CategoryId::new(3), "lifters", "Lifters")
            .with_description("Barras elevadoras para molinos SAC")
            .with_image(thumb(IMG_LIFTER))
            .with_product_count(12),
        Category::new(CategoryId::new(4), "transmision", "Componentes de Transmisión")
            .with_description("Piñones, coronas y componentes de transmisión")
            .with_image(thumb(IMG_GEAR))
            .with_product_count(15),
        Category::new(CategoryId::new(5), "sellos-juntas", "Sellos y Juntas")
            .with_description("Sellos mecánicos y juntas de estanqueidad")
            .with_image(thumb(IMG_SEAL))
            .with_product_count(20),
        Category::new(CategoryId::new(6), "repuestos-varios", "Repuestos Varios")
            .with_description("Otros repuestos y componentes para molinos")
            .with_image(thumb(IMG_PLANT))
            .with_product_count(30),
    ]
}

pub(crate) fn products() -> Vec<Product> {
    let cats = categories();
    let liners = &cats[0];
    let bolts = &cats[1];
    let lifters = &cats[2];
    let drive = &cats[3];
    let seals = &cats[4];

    vec![
        Product::new(ProductId::new(1), "REV-SAC5000-001", "Revestimiento Shell Molino SAC 5000", liners)
            .with_description(
                "Revestimiento de casco fabricado en acero al manganeso de alta resistencia al \
                 impacto y abrasión. Diseñado específicamente para molinos SAC 5000 con geometría \
                 optimizada para máxima eficiencia de molienda.",
            )
            .with_image(IMG_LINER)
            .with_image(IMG_PLANT)
            .with_spec("Material", "Acero al Manganeso Austenítico")
            .with_spec("Dureza", "220-280 HB")
            .with_spec("Peso", "450 kg")
            .with_spec("Espesor", "75 mm")
            .with_spec("Largo", "1200 mm")
            .with_spec("Ancho", "800 mm")
            .with_compatible_models(["SAC 5000", "SAC 5500"])
            .with_delivery_days(5),
        Product::new(ProductId::new(2), "REV-SAC6000-001", "Revestimiento Shell Molino SAC 6000", liners)
            .with_description(
                "Revestimiento de casco de alta performance para molinos SAC 6000. Fabricado con \
                 aleación especial para máxima durabilidad en condiciones extremas de operación.",
            )
            .with_image(IMG_LINER)
            .with_spec("Material", "Acero al Cromo-Molibdeno")
            .with_spec("Dureza", "250-320 HB")
            .with_spec("Peso", "520 kg")
            .with_spec("Espesor", "85 mm")
            .with_spec("Largo", "1400 mm")
            .with_spec("Ancho", "900 mm")
            .with_compatible_models(["SAC 6000", "SAC 6500"])
            .with_delivery_days(7),
        Product::new(ProductId::new(3), "REV-HEAD-5000", "Revestimiento Tapa Descarga SAC 5000", liners)
            .with_description(
                "Revestimiento para tapa de descarga con diseño de flujo optimizado. Resistente a \
                 la abrasión y al impacto de material.",
            )
            .with_image(IMG_LIFTER)
            .with_spec("Material", "Acero al Manganeso")
            .with_spec("Dureza", "220 HB")
            .with_spec("Peso", "380 kg")
            .with_spec("Diámetro", "1800 mm")
            .with_compatible_models(["SAC 5000"])
            .with_stock(false)
            .with_delivery_days(15),
        Product::new(ProductId::new(4), "PERNO-M36-001", "Perno Liner M36 x 180mm", bolts)
            .with_description(
                "Perno de alta resistencia para fijación de revestimientos. Grado 10.9 con tuerca \
                 y arandela incluida. Tratamiento anticorrosivo.",
            )
            .with_image(IMG_BOLT)
            .with_spec("Grado", "10.9")
            .with_spec("Diámetro", "M36")
            .with_spec("Largo", "180 mm")
            .with_spec("Material", "Acero aleado")
            .with_spec("Recubrimiento", "Zinc-Níquel")
            .with_compatible_models(["SAC 5000", "SAC 6000", "SAC 5500", "SAC 6500"])
            .with_delivery_days(3),
        Product::new(ProductId::new(5), "PERNO-M42-001", "Perno Liner M42 x 200mm", bolts)
            .with_description(
                "Perno de extra alta resistencia para aplicaciones de alto torque. Grado 12.9 con \
                 sistema de fijación seguro.",
            )
            .with_image(IMG_BOLT)
            .with_spec("Grado", "12.9")
            .with_spec("Diámetro", "M42")
            .with_spec("Largo", "200 mm")
            .with_spec("Material", "Acero aleado")
            .with_spec("Recubrimiento", "Dacromet")
            .with_compatible_models(["SAC 6000", "SAC 6500", "SAC 7000"])
            .with_delivery_days(3),
        Product::new(ProductId::new(6), "LIFT-SAC5000-HI", "Lifter Bar Alto SAC 5000", lifters)
            .with_description(
                "Barra elevadora de perfil alto para molinos SAC 5000. Diseño optimizado para \
                 máxima elevación de carga y eficiencia de molienda.",
            )
            .with_image(IMG_LIFTER)
            .with_spec("Material", "Acero al Cromo")
            .with_spec("Altura", "150 mm")
            .with_spec("Largo", "3600 mm")
            .with_spec("Peso", "280 kg")
            .with_spec("Ángulo de ataque", "15°")
            .with_compatible_models(["SAC 5000", "SAC 5500"])
            .with_delivery_days(10),
        Product::new(ProductId::new(7), "LIFT-SAC6000-HI", "Lifter Bar Alto SAC 6000", lifters)
            .with_description(
                "Barra elevadora de perfil alto para molinos SAC 6000. Mayor resistencia al \
                 desgaste con aleación especial.",
            )
            .with_image(IMG_LIFTER)
            .with_spec("Material", "Acero al Cromo-Molibdeno")
            .with_spec("Altura", "180 mm")
            .with_spec("Largo", "4200 mm")
            .with_spec("Peso", "350 kg")
            .with_spec("Ángulo de ataque", "18°")
            .with_compatible_models(["SAC 6000", "SAC 6500"])
            .with_stock(false)
            .with_delivery_days(20),
        Product::new(ProductId::new(8), "PIN-CORONA-001", "Piñón de Ataque Molino SAC", drive)
            .with_description(
                "Piñón de ataque forjado y mecanizado con precisión. Dientes templados por \
                 inducción para máxima durabilidad.",
            )
            .with_image(IMG_GEAR)
            .with_spec("Módulo", "24")
            .with_spec("Número de dientes", "18")
            .with_spec("Material", "Acero 4340")
            .with_spec("Dureza dientes", "55-60 HRC")
            .with_spec("Peso", "850 kg")
            .with_compatible_models(["SAC 5000", "SAC 6000"])
            .with_delivery_days(30),
        Product::new(ProductId::new(9), "SELLO-TRUNNION-001", "Sello Trunnion Completo", seals)
            .with_description(
                "Conjunto de sello para muñón de molino. Incluye sello principal, sello de polvo \
                 y componentes de montaje.",
            )
            .with_image(IMG_SEAL)
            .with_spec("Tipo", "Laberinto + Labio")
            .with_spec("Diámetro interno", "2000 mm")
            .with_spec("Material sello", "NBR reforzado")
            .with_spec("Material laberinto", "Bronce SAE 660")
            .with_compatible_models(["SAC 5000", "SAC 5500", "SAC 6000"])
            .with_delivery_days(12),
        Product::new(ProductId::new(10), "JUNTA-TAPA-001", "Junta Tapa Inspección", seals)
            .with_description(
                "Junta de estanqueidad para tapa de inspección de molino. Material resistente a \
                 temperaturas y presión.",
            )
            .with_image(IMG_SEAL)
            .with_spec("Material", "Grafito expandido")
            .with_spec("Espesor", "3 mm")
            .with_spec("Diámetro exterior", "600 mm")
            .with_spec("Temperatura máx", "450°C")
            .with_compatible_models(["SAC 5000", "SAC 6000", "SAC 5500", "SAC 6500"])
            .with_delivery_days(5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_dataset_shape() {
        let products = products();
        assert_eq!(categories().len(), 6);
        assert_eq!(products.len(), 10);
        assert_eq!(products.iter().filter(|p| !p.in_stock).count(), 2);
    }

    #[test]
    fn test_dataset_identifiers_unique() {
        let products = products();
        let ids: HashSet<_> = products.iter().map(|p| p.id).collect();
        let skus: HashSet<_> = products.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(ids.len(), products.len());
        assert_eq!(skus.len(), products.len());
        assert!(categories().iter().all(Category::has_valid_slug));
    }
}
