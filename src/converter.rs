// ============================================================================
// Conversion fiat → crypto
// ============================================================================
// quantité = montant / prix unitaire, puis arrondi selon des paliers :
//
//   v == 0        → 2 décimales
//   v < 0.00001   → 8 décimales
//   v < 0.01      → 6 décimales
//   v < 1         → 4 décimales
//   sinon         → 2 décimales
//
// Un petit montant converti en bitcoin donne 0.00000200, un gros montant
// converti en memecoin donne 2500000.00 : une précision fixe écraserait
// l'un ou noierait l'autre.
// ============================================================================

use rust_decimal::{Decimal, RoundingStrategy};

/// Résultat affiché quand le montant est vide, invalide ou sans actif
pub const ZERO_RESULT: &str = "0.00";

/// Convertit un montant saisi en quantité d'actif formatée
///
/// # Arguments
/// * `amount` - Texte libre, peut contenir des séparateurs de milliers (",")
/// * `unit_price` - Prix de l'actif sélectionné, None si aucun actif
///
/// # Exemple
/// convert("1,000.50", Some(2.0)) == "500.25"
pub fn convert(amount: &str, unit_price: Option<f64>) -> String {
    let price = match unit_price {
        Some(p) if p.is_finite() && p > 0.0 => p,
        _ => return ZERO_RESULT.to_string(),
    };

    let amount = match parse_amount(amount) {
        Some(a) => a,
        None => return ZERO_RESULT.to_string(),
    };

    format_quantity(amount / price)
}

/// Retire les séparateurs et parse un décimal positif
///
/// CONCEPT RUST : validation avant parse
/// - f64::from_str accepte "inf", "NaN", "1e5" ou "-3"
/// - On vérifie donc d'abord la forme "chiffres[.chiffres]"
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|&c| c != ',').collect();

    let has_digit = cleaned.chars().any(|c| c.is_ascii_digit());
    if !has_digit || !is_decimal_text(&cleaned) {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Applique les paliers de précision
pub fn format_quantity(value: f64) -> String {
    let decimals = if value == 0.0 {
        2
    } else if value < 0.00001 {
        8
    } else if value < 0.01 {
        6
    } else if value < 1.0 {
        4
    } else {
        2
    };
    round_half_up(value, decimals)
}

/// Arrondit à `decimals` décimales, les demis s'éloignant de zéro
///
/// CONCEPT : `format!("{:.2}")` arrondit 1.125 en "1.12" (demi au pair).
/// Decimal::from_f64_retain garde la valeur binaire exacte, seul un vrai
/// demi est arrondi vers le haut : 1.125 → "1.13".
fn round_half_up(value: f64, decimals: u32) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let mut rounded =
                exact.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(decimals);
            rounded.to_string()
        }
        // Hors de la plage de Decimal (~7.9e28)
        None => format!("{:.*}", decimals as usize, value),
    }
}

/// true si le texte est accepté par le champ montant
///
/// Forme acceptée : chiffres optionnels, un point optionnel, chiffres
/// optionnels. "" , "12", "12.", ".5" sont valides ; "1.2.3", "1,000",
/// "-1" ne le sont pas.
pub fn is_decimal_text(text: &str) -> bool {
    let mut seen_dot = false;
    for c in text.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_separators_stripped() {
        assert_eq!(convert("1,000.50", Some(2.0)), "500.25");
    }

    #[test]
    fn test_empty_or_invalid_amount() {
        assert_eq!(convert("", Some(2.0)), "0.00");
        assert_eq!(convert("abc", Some(2.0)), "0.00");
        assert_eq!(convert(".", Some(2.0)), "0.00");
        assert_eq!(convert("-5", Some(2.0)), "0.00");
        assert_eq!(convert("1e5", Some(2.0)), "0.00");
    }

    #[test]
    fn test_no_selected_asset() {
        assert_eq!(convert("100", None), "0.00");
        assert_eq!(convert("100", Some(0.0)), "0.00");
    }

    #[test]
    fn test_precision_tiers() {
        // < 0.00001 → 8 décimales
        assert_eq!(convert("1", Some(500_000.0)), "0.00000200");
        // < 0.01 → 6 décimales
        assert_eq!(convert("1", Some(200.0)), "0.005000");
        // < 1 → 4 décimales
        assert_eq!(convert("1", Some(4.0)), "0.2500");
        // >= 1 → 2 décimales
        assert_eq!(convert("50", Some(0.02)), "2500.00");
        // zéro → 2 décimales
        assert_eq!(convert("0", Some(67_000.0)), "0.00");
    }

    #[test]
    fn test_halfway_values_round_up() {
        // 1 / 128 = 0.0078125 → 6 décimales
        assert_eq!(convert("1", Some(128.0)), "0.007813");
        // 0.0625 / 2 = 0.03125 → 4 décimales
        assert_eq!(convert("0.0625", Some(2.0)), "0.0313");
        // 2.25 / 2 = 1.125 → 2 décimales
        assert_eq!(convert("2.25", Some(2.0)), "1.13");
        assert_eq!(convert("10.125", Some(1.0)), "10.13");
        // 8 décimales : aucun demi exact en binaire sous 0.00001
        assert_eq!(convert("1", Some(400_000.0)), "0.00000250");
    }

    #[test]
    fn test_non_halfway_values_unchanged() {
        // 1.124 reste sous le demi
        assert_eq!(convert("1.124", Some(1.0)), "1.12");
        assert_eq!(format_quantity(0.0), "0.00");
        assert_eq!(format_quantity(123_456.789), "123456.79");
    }

    #[test]
    fn test_is_decimal_text() {
        assert!(is_decimal_text(""));
        assert!(is_decimal_text("12"));
        assert!(is_decimal_text("12."));
        assert!(is_decimal_text(".5"));
        assert!(!is_decimal_text("1.2.3"));
        assert!(!is_decimal_text("1,000"));
        assert!(!is_decimal_text("-1"));
        assert!(!is_decimal_text("1a"));
    }
}
