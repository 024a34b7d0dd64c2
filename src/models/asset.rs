// ============================================================================
// Structures : Asset et RankedAssetList
// ============================================================================
// Asset : un crypto-actif tel que retourné par un fetch du listing
// RankedAssetList : la liste triée et filtrée présentée à l'utilisateur
//
// CONCEPTS RUST :
// 1. Snapshot immuable : un Asset n'est jamais modifié champ par champ,
//    chaque refresh remplace toute la liste
// 2. Newtype : RankedAssetList enveloppe un Vec<Asset> pour exposer
//    uniquement des accès en lecture
// ============================================================================

/// Crypto-actif coté dans la devise fiat active
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Identifiant unique CoinGecko (ex: "bitcoin")
    pub id: String,

    /// Nom affiché (ex: "Bitcoin")
    pub name: String,

    /// Symbole (ex: "btc"), tel que fourni par l'API
    pub symbol: String,

    /// Prix unitaire dans la devise fiat active
    pub current_price: f64,

    /// URL de l'icône, optionnelle
    pub image: Option<String>,

    /// Rang par capitalisation, optionnel
    pub market_cap_rank: Option<u32>,
}

impl Asset {
    /// Crée un Asset sans icône ni rang (pratique pour les tests)
    pub fn new(id: &str, name: &str, symbol: &str, current_price: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            current_price,
            image: None,
            market_cap_rank: None,
        }
    }

    /// Symbole en majuscules pour l'affichage (ex: "BTC")
    pub fn ticker(&self) -> String {
        self.symbol.to_uppercase()
    }

    /// Libellé de la liste : "Bitcoin (BTC)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.ticker())
    }
}

/// Liste ordonnée d'actifs, produite par le curateur
///
/// Invariant : construite uniquement via `Curator::curate`, donc déjà
/// filtrée, tronquée et triée.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedAssetList {
    assets: Vec<Asset>,
}

impl RankedAssetList {
    pub(crate) fn from_sorted(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Asset> {
        self.assets.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asset> {
        self.assets.iter()
    }

    /// Position d'un identifiant dans la liste
    pub fn position(&self, id: &str) -> Option<usize> {
        self.assets.iter().position(|a| a.id == id)
    }

    pub fn as_slice(&self) -> &[Asset] {
        &self.assets
    }
}

/// Formate un prix avec séparateurs de milliers et au plus 2 décimales
///
/// Format : 67123.456 → "67,123.46", 0.5 → "0.5", 1200.0 → "1,200"
///
/// CONCEPT RUST : String building caractère par caractère
/// - On formate d'abord avec 2 décimales puis on retire les zéros inutiles
/// - Les groupes de 3 chiffres sont insérés en partant de la droite
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "N/A".to_string();
    }

    let fixed = format!("{:.2}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if price < 0.0 && fixed != "0.00" { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_label() {
        let asset = Asset::new("bitcoin", "Bitcoin", "btc", 67000.0);
        assert_eq!(asset.ticker(), "BTC");
        assert_eq!(asset.label(), "Bitcoin (BTC)");
    }

    #[test]
    fn test_ranked_list_position() {
        let list = RankedAssetList::from_sorted(vec![
            Asset::new("bitcoin", "Bitcoin", "btc", 1.0),
            Asset::new("ethereum", "Ethereum", "eth", 1.0),
        ]);
        assert_eq!(list.position("ethereum"), Some(1));
        assert_eq!(list.position("dogecoin"), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(67123.456), "67,123.46");
        assert_eq!(format_price(1200.0), "1,200");
        assert_eq!(format_price(0.5), "0.5");
        assert_eq!(format_price(999.999), "1,000");
        assert_eq!(format_price(1234567.1), "1,234,567.1");
        assert_eq!(format_price(f64::NAN), "N/A");
    }
}
