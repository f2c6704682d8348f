use maud::{html, Markup};

use crate::{config::BrandOptions, location::Location};

const MAX_POPUP_IMAGES: usize = 2;

/// `<name>@<domain>` with the name lower-cased and whitespace removed.
/// Empty when the location has no name.
pub fn contact_email(location: &Location, brand: &BrandOptions) -> String {
    match location.name.as_deref() {
        Some(name) => {
            let local: String = name
                .to_lowercase()
                .chars()
                .filter(|ch| !ch.is_whitespace())
                .collect();
            format!("{}@{}", local, brand.email_domain)
        }
        None => String::new(),
    }
}

pub fn render_popup(location: &Location, brand: &BrandOptions) -> Markup {
    let link = location.link.as_deref().unwrap_or("#");
    let phone = location
        .phone
        .as_deref()
        .or(brand.fallback_phone.as_deref())
        .unwrap_or_default();
    let dial: String = phone.chars().filter(|ch| !ch.is_whitespace()).collect();
    let email = contact_email(location, brand);

    html! {
        div class="card location-popup" data-location=(location.display_name()) {
            button type="button" class="delete popup-close" aria-label="close" data-command="dismiss_popup" {}
            div class="card-content" {
                a href=(link) class="title is-4 has-text-danger" { (location.display_name()) }
                div class="content is-small mt-3" {
                    p class="popup-address" { (location.address) }
                    p class="popup-size" { (location.size.as_deref().unwrap_or_default()) }
                    p class="popup-phone" {
                        @if !phone.is_empty() {
                            a href=(format!("tel:{dial}")) { (phone) }
                        }
                    }
                    p class="popup-email" {
                        @if !email.is_empty() {
                            a href=(format!("mailto:{email}")) { (email) }
                        }
                    }
                }
            }
            @if !location.gallery.is_empty() {
                div class="columns is-mobile is-variable is-1 px-3 pb-3" {
                    @for url in location.gallery.iter().take(MAX_POPUP_IMAGES) {
                        div class="column" {
                            figure class="image is-4by3" {
                                img src=(url) alt="";
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::location;

    #[test]
    fn test_contact_email() {
        let brand = BrandOptions::default();
        assert_eq!(
            contact_email(&location("North Perth", "WA", None), &brand),
            "northperth@revofitness.com.au"
        );
        assert_eq!(contact_email(&location("", "WA", None), &brand), "");
    }

    #[test]
    fn test_popup_content() {
        let mut belmont = location("Belmont", "WA", Some((115.93, -31.95)));
        belmont.link = Some(String::from("https://revofitness.com.au/gyms/belmont/"));
        belmont.address = String::from("227 Great Eastern Hwy");
        belmont.phone = Some(String::from("08 6323 0000"));
        belmont.gallery = vec![
            String::from("https://img.example/1.jpg"),
            String::from("https://img.example/2.jpg"),
            String::from("https://img.example/3.jpg"),
        ];
        let html = render_popup(&belmont, &BrandOptions::default()).into_string();

        assert!(html.contains("href=\"https://revofitness.com.au/gyms/belmont/\""));
        assert!(html.contains("227 Great Eastern Hwy"));
        assert!(html.contains("href=\"tel:0863230000\""));
        assert!(html.contains("mailto:belmont@revofitness.com.au"));
        assert!(html.contains("data-command=\"dismiss_popup\""));
        assert_eq!(html.matches("<img").count(), 2);
    }

    #[test]
    fn test_popup_missing_fields() {
        let unnamed = location("", "", None);
        let html = render_popup(&unnamed, &BrandOptions::default()).into_string();

        assert!(html.contains("Unnamed Location"));
        assert!(html.contains("tel:1300738638"));
        assert!(!html.contains("mailto:"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("undefined"));

        let brand = BrandOptions {
            fallback_phone: None,
            ..BrandOptions::default()
        };
        let html = render_popup(&unnamed, &brand).into_string();
        assert!(!html.contains("tel:"));
    }
}
