//! Plain-text renderings of the dealer list and treatment timeline.

use std::fmt::Write as _;

use agroscan_core::{EnrichedDealer, TreatmentStep};

/// Dealer cards in input order, one block per dealer.
#[must_use]
pub fn render_dealer_cards(dealers: &[EnrichedDealer]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Your location • {} dealers nearby", dealers.len());

    for enriched in dealers {
        let dealer = &enriched.dealer;
        let stock = if dealer.has_stock {
            "In Stock"
        } else {
            "Out of Stock"
        };
        let badge = if enriched.verified { " [verified]" } else { "" };

        let _ = writeln!(out);
        let _ = writeln!(out, "{}{badge}  ({stock})", dealer.name);
        let _ = writeln!(out, "  {}", dealer.address);
        let _ = writeln!(out, "  {}", enriched.distance_label());

        let contact = match (&enriched.phone, enriched.is_contactable()) {
            (Some(phone), _) => phone.as_str(),
            (None, true) => "Contact",
            (None, false) => "Contact (unavailable)",
        };
        let _ = writeln!(out, "  {contact}");
    }
    out
}

/// Treatment steps ordered by day.
#[must_use]
pub fn render_timeline(steps: &[TreatmentStep]) -> String {
    let mut ordered: Vec<&TreatmentStep> = steps.iter().collect();
    ordered.sort_by_key(|s| s.day);

    let mut out = String::from("7-Day Recovery Schedule\n");
    for step in ordered {
        let mark = if step.completed { "x" } else { " " };
        let _ = writeln!(out, "[{mark}] Day {}: {}", step.day, step.title);
        if !step.detail.is_empty() {
            let _ = writeln!(out, "      {}", step.detail);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use agroscan_core::Dealer;

    use super::*;

    fn enriched(name: &str, has_stock: bool, phone: Option<&str>) -> EnrichedDealer {
        EnrichedDealer {
            dealer: Dealer {
                id: name.to_owned(),
                name: name.to_owned(),
                address: "Main Road, Pune".to_owned(),
                distance: "2.3 km".to_owned(),
                has_stock,
                lat: 18.52,
                lng: 73.86,
            },
            verified: phone.is_some(),
            phone: phone.map(str::to_owned),
            distance_km: None,
        }
    }

    #[test]
    fn cards_show_header_stock_and_contact() {
        let mut first = enriched("Krishi Seva Kendra", true, Some("020 2612 3456"));
        first.distance_km = Some(1.4);
        let text = render_dealer_cards(&[
            first,
            enriched("Agro Center", true, None),
            enriched("Farm Solutions Center", false, None),
        ]);

        assert!(text.starts_with("Your location • 3 dealers nearby\n"));
        assert!(text.contains("Krishi Seva Kendra [verified]  (In Stock)"));
        assert!(text.contains("  1.4 km\n"));
        assert!(text.contains("  020 2612 3456\n"));
        assert!(text.contains("Agro Center  (In Stock)\n  Main Road, Pune\n  2.3 km\n  Contact\n"));
        assert!(text.contains("Farm Solutions Center  (Out of Stock)"));
        assert!(text.contains("Contact (unavailable)"));
    }

    #[test]
    fn empty_list_has_only_header() {
        assert_eq!(render_dealer_cards(&[]), "Your location • 0 dealers nearby\n");
    }

    #[test]
    fn timeline_is_sorted_by_day() {
        let steps = vec![
            TreatmentStep::from_labelled_day("7", 3, "Prevention".into(), String::new()),
            TreatmentStep::from_labelled_day("Day 1", 1, "Urgent".into(), "Spray".into()),
            TreatmentStep::from_labelled_day("3", 2, "Follow-up".into(), String::new()),
        ];
        let text = render_timeline(&steps);
        let expected = "7-Day Recovery Schedule\n\
                        [ ] Day 1: Urgent\n      Spray\n\
                        [ ] Day 3: Follow-up\n\
                        [ ] Day 7: Prevention\n";
        assert_eq!(text, expected);
    }
}
