// ============================================================================
// Enum : FiatCurrency
// ============================================================================
// Les 8 devises fiat proposées à l'utilisateur
//
// CONCEPTS RUST :
// 1. Enum Copy : pas d'allocation, se passe par valeur partout
// 2. &'static str : les libellés vivent dans le binaire
// 3. Cycle d'états : next() / previous() comme un carrousel
//
// Configuration statique : jamais récupérée depuis l'API
// ============================================================================

use std::fmt;
use std::str::FromStr;

/// Devise fiat dans laquelle les prix sont cotés
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiatCurrency {
    Usd,
    Sgd,
    Vnd,
    Thb,
    Idr,
    Myr,
    Cny,
    Eur,
}

impl FiatCurrency {
    /// Toutes les devises, dans l'ordre d'affichage du sélecteur
    pub const ALL: [FiatCurrency; 8] = [
        FiatCurrency::Usd,
        FiatCurrency::Sgd,
        FiatCurrency::Vnd,
        FiatCurrency::Thb,
        FiatCurrency::Idr,
        FiatCurrency::Myr,
        FiatCurrency::Cny,
        FiatCurrency::Eur,
    ];

    /// Code ISO 4217 (ex: "USD")
    pub fn code(&self) -> &'static str {
        match self {
            FiatCurrency::Usd => "USD",
            FiatCurrency::Sgd => "SGD",
            FiatCurrency::Vnd => "VND",
            FiatCurrency::Thb => "THB",
            FiatCurrency::Idr => "IDR",
            FiatCurrency::Myr => "MYR",
            FiatCurrency::Cny => "CNY",
            FiatCurrency::Eur => "EUR",
        }
    }

    /// Code en minuscules, format attendu par le paramètre `vs_currency`
    pub fn api_code(&self) -> String {
        self.code().to_lowercase()
    }

    /// Nom complet (ex: "US Dollar")
    pub fn name(&self) -> &'static str {
        match self {
            FiatCurrency::Usd => "US Dollar",
            FiatCurrency::Sgd => "Singapore Dollar",
            FiatCurrency::Vnd => "Vietnamese Dong",
            FiatCurrency::Thb => "Thai Baht",
            FiatCurrency::Idr => "Indonesian Rupiah",
            FiatCurrency::Myr => "Malaysian Ringgit",
            FiatCurrency::Cny => "Chinese Yuan",
            FiatCurrency::Eur => "Euro",
        }
    }

    /// Symbole monétaire (ex: "$", "S$", "₫")
    pub fn symbol(&self) -> &'static str {
        match self {
            FiatCurrency::Usd => "$",
            FiatCurrency::Sgd => "S$",
            FiatCurrency::Vnd => "₫",
            FiatCurrency::Thb => "฿",
            FiatCurrency::Idr => "Rp",
            FiatCurrency::Myr => "RM",
            FiatCurrency::Cny => "¥",
            FiatCurrency::Eur => "€",
        }
    }

    /// Drapeau affiché à côté du nom
    pub fn flag(&self) -> &'static str {
        match self {
            FiatCurrency::Usd => "🇺🇸",
            FiatCurrency::Sgd => "🇸🇬",
            FiatCurrency::Vnd => "🇻🇳",
            FiatCurrency::Thb => "🇹🇭",
            FiatCurrency::Idr => "🇮🇩",
            FiatCurrency::Myr => "🇲🇾",
            FiatCurrency::Cny => "🇨🇳",
            FiatCurrency::Eur => "🇪🇺",
        }
    }

    /// Devise suivante (USD → SGD → ... → EUR → USD)
    pub fn next(&self) -> FiatCurrency {
        let index = self.position();
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Devise précédente (USD → EUR → CNY → ...)
    pub fn previous(&self) -> FiatCurrency {
        let index = self.position();
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn position(&self) -> usize {
        // ALL contient toutes les variantes, la recherche aboutit toujours
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }
}

impl Default for FiatCurrency {
    fn default() -> Self {
        FiatCurrency::Usd
    }
}

impl fmt::Display for FiatCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parse un code de devise, insensible à la casse ("usd", "EUR")
///
/// CONCEPT RUST : FromStr
/// - Permet d'écrire "eur".parse::<FiatCurrency>()
/// - Utilisé par la configuration (LAZYSWAP_DEFAULT_FIAT)
impl FromStr for FiatCurrency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow::anyhow!("Devise fiat inconnue : {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_currencies() {
        assert_eq!(FiatCurrency::ALL.len(), 8);
        assert_eq!(FiatCurrency::default(), FiatCurrency::Usd);
    }

    #[test]
    fn test_fiat_cycle() {
        assert_eq!(FiatCurrency::Usd.next(), FiatCurrency::Sgd);
        assert_eq!(FiatCurrency::Eur.next(), FiatCurrency::Usd);
        assert_eq!(FiatCurrency::Usd.previous(), FiatCurrency::Eur);
        assert_eq!(FiatCurrency::Sgd.previous(), FiatCurrency::Usd);
    }

    #[test]
    fn test_fiat_from_str() {
        assert_eq!("eur".parse::<FiatCurrency>().unwrap(), FiatCurrency::Eur);
        assert_eq!(" VND ".parse::<FiatCurrency>().unwrap(), FiatCurrency::Vnd);
        assert!("GBP".parse::<FiatCurrency>().is_err());
    }

    #[test]
    fn test_api_code_is_lowercase() {
        assert_eq!(FiatCurrency::Myr.api_code(), "myr");
        assert_eq!(FiatCurrency::Thb.symbol(), "฿");
    }
}
