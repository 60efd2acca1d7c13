//! Prompt construction for the restaurant chat assistant.
//!
//! All customer-facing prompts are in Turkish, matching the site's
//! audience.

use std::fmt::Write as _;

use crate::models::menu::Menu;
use crate::models::restaurant::Restaurant;

/// Build the waiter-persona context block from restaurant data and its
/// active menus.
#[must_use]
pub fn restaurant_context(restaurant: &Restaurant, menus: &[Menu]) -> String {
    let mut context = String::new();

    let _ = writeln!(
        context,
        "Sen bu restoranın garsonusun ve müşterilerin sorularına cevap veriyorsun."
    );
    let _ = writeln!(context, "Cevapların 2-3 cümleyi geçmemeli.");
    let _ = writeln!(context, "Bu restoran hakkında bilgiler:");
    let _ = writeln!(context);
    let _ = writeln!(context, "Restoran: {}", restaurant.name);
    let _ = writeln!(
        context,
        "Açıklama: {}",
        or_unknown(restaurant.description.as_deref())
    );
    let _ = writeln!(
        context,
        "Adres: {}",
        or_unknown(restaurant.address.as_deref())
    );
    let _ = writeln!(
        context,
        "Telefon: {}",
        or_unknown(restaurant.phone.as_deref())
    );
    let _ = writeln!(
        context,
        "E-posta: {}",
        or_unknown(restaurant.email.as_deref())
    );

    if !restaurant.cuisine_types.is_empty() {
        let _ = writeln!(
            context,
            "Mutfak Türleri: {}",
            restaurant.cuisine_types.join(", ")
        );
    }

    if !restaurant.hours.is_empty() {
        let _ = writeln!(context, "Çalışma Saatleri:");
        for (day, hours) in &restaurant.hours {
            let _ = writeln!(context, "- {day}: {}", hours.as_str().unwrap_or("Bilinmiyor"));
        }
    }

    let _ = writeln!(context);
    let _ = writeln!(context, "Menü Kategorileri:");
    for menu in menus.iter().filter(|m| m.is_active) {
        for category in &menu.categories {
            let _ = writeln!(context, "- {}:", category.name);
            for item in &category.items {
                let _ = write!(context, "  * {} - {}", item.name, item.price);
                if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
                    let _ = write!(context, " ({description})");
                }
                let _ = writeln!(context);
            }
        }
    }

    context
}

/// Wrap a customer question with the restaurant context and the answer
/// instructions.
#[must_use]
pub fn question_prompt(context: &str, question: &str) -> String {
    format!(
        "{context}\n\
         Kullanıcı Sorusu: {question}\n\n\
         Lütfen yukarıdaki restoran bilgilerine dayanarak bu soruyu Türkçe olarak yanıtlayın.\n\
         Eğer bilgi mevcut değilse, \"Bu konuda bilgi bulunmamaktadır\" şeklinde yanıtlayın.\n\
         Yanıtınız kısa, net ve yardımcı olsun."
    )
}

/// The menu-image extraction prompt, asking for a fixed JSON shape.
#[must_use]
pub fn menu_image_prompt(language: &str) -> &'static str {
    if language == "en" {
        "Read all text from this menu and list them. Include prices next to the items. \
         Please respond in the following JSON format: \
         {\"menuName\": \"Menu name\", \"description\": \"Menu description\", \
         \"categories\": [{\"name\": \"Category name\", \"products\": \
         [{\"name\": \"Product name\", \"price\": \"Price (TL)\", \
         \"description\": \"Product description\"}]}]}"
    } else {
        "Bu menüdeki tüm yazıları oku ve listele. Yazıların yanında fiyatları da listele. \
         Lütfen aşağıdaki JSON formatında yanıt verin: \
         {\"menuName\": \"Menü adı\", \"description\": \"Menü açıklaması\", \
         \"categories\": [{\"name\": \"Kategori adı\", \"products\": \
         [{\"name\": \"Ürün adı\", \"price\": \"Fiyat (TL)\", \
         \"description\": \"Ürün açıklaması\"}]}]}"
    }
}

fn or_unknown(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "Bilinmiyor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::menu::{MenuCategory, MenuItem};

    fn sample_restaurant() -> Restaurant {
        Restaurant {
            slug: "lezzet-duragi".to_string(),
            name: "Lezzet Durağı".to_string(),
            description: Some("Geleneksel Türk mutfağı".to_string()),
            cuisine_types: vec!["Kebap".to_string(), "Ev Yemekleri".to_string()],
            tags: vec![],
            phone: Some("+90 212 000 00 00".to_string()),
            email: None,
            website: None,
            address: Some("İstiklal Cad. 1, Beyoğlu, İstanbul".to_string()),
            hours: serde_json::Map::new(),
            is_active: true,
            is_featured: false,
            owner: None,
            editor: None,
        }
    }

    fn sample_menu(active: bool) -> Menu {
        Menu {
            name: "Ana Menü".to_string(),
            description: String::new(),
            restaurant_id: "lezzet-duragi".to_string(),
            language: "tr".to_string(),
            categories: vec![MenuCategory {
                name: "Kebaplar".to_string(),
                items: vec![MenuItem {
                    name: "Adana Kebap".to_string(),
                    price: "240 TL".to_string(),
                    description: Some("Acılı".to_string()),
                    allergens: vec![],
                    spice_level: None,
                }],
            }],
            is_active: active,
            is_ai_generated: serde_json::Map::new(),
            restaurant_name: None,
        }
    }

    #[test]
    fn test_context_includes_menu_items_with_prices() {
        let context = restaurant_context(&sample_restaurant(), &[sample_menu(true)]);
        assert!(context.contains("Restoran: Lezzet Durağı"));
        assert!(context.contains("* Adana Kebap - 240 TL (Acılı)"));
    }

    #[test]
    fn test_context_skips_inactive_menus() {
        let context = restaurant_context(&sample_restaurant(), &[sample_menu(false)]);
        assert!(!context.contains("Adana Kebap"));
    }

    #[test]
    fn test_missing_fields_read_unknown() {
        let mut restaurant = sample_restaurant();
        restaurant.email = None;
        let context = restaurant_context(&restaurant, &[]);
        assert!(context.contains("E-posta: Bilinmiyor"));
    }

    #[test]
    fn test_question_prompt_embeds_question() {
        let prompt = question_prompt("ctx", "Kaçta açıksınız?");
        assert!(prompt.contains("Kullanıcı Sorusu: Kaçta açıksınız?"));
        assert!(prompt.contains("Türkçe olarak"));
    }

    #[test]
    fn test_image_prompt_language_selection() {
        assert!(menu_image_prompt("tr").contains("Bu menüdeki"));
        assert!(menu_image_prompt("en").contains("Read all text"));
        // Unknown languages fall back to Turkish.
        assert!(menu_image_prompt("de").contains("Bu menüdeki"));
    }
}
