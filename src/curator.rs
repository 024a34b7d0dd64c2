// ============================================================================
// Curateur : filtrage et classement du listing CoinGecko
// ============================================================================
// Transforme le listing brut (jusqu'à 150 actifs, triés par capitalisation)
// en une RankedAssetList :
//   1. Filtre : retire stablecoins et actifs "wrapped"
//   2. Troncature : garde les 100 premiers survivants
//   3. Tri : bitcoin, ethereum, ripple en tête, puis ordre alphabétique
//
// CONCEPTS RUST :
// 1. Trait objet : Box<dyn AssetFilter> rend le filtre interchangeable
// 2. sort_by est stable : les égalités gardent l'ordre d'entrée
// 3. Ordering::then_with pour chaîner les critères de comparaison
// ============================================================================

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::models::{Asset, RankedAssetList};

/// Identifiants de stablecoins connus
pub const STABLECOINS: [&str; 15] = [
    "tether",
    "usd-coin",
    "dai",
    "first-digital-usd",
    "ethena-usde",
    "usdd",
    "true-usd",
    "paxos-standard",
    "binance-usd",
    "frax",
    "paypal-usd",
    "sky-dollar",
    "gemini-dollar",
    "liquity-usd",
    "s-usd",
];

/// Actifs de référence toujours affichés en premier, dans cet ordre
pub const PRIORITY_ASSETS: [&str; 3] = ["bitcoin", "ethereum", "ripple"];

/// Nombre maximal d'actifs conservés après filtrage
pub const MAX_CURATED_ASSETS: usize = 100;

// ============================================================================
// Trait : AssetFilter
// ============================================================================
// CONCEPT RUST : Trait comme point d'extension
// - Le classement ne connaît que `excludes()`
// - On peut enrichir la denylist sans toucher à l'algorithme de tri
// ============================================================================

/// Prédicat d'exclusion appliqué au listing brut
pub trait AssetFilter: Send {
    /// true si l'actif doit être retiré de la liste
    fn excludes(&self, asset: &Asset) -> bool;
}

/// Denylist heuristique : stablecoins et actifs wrapped
///
/// Approximative par nature : un symbole contenant "usd" est traité comme
/// un stablecoin même s'il n'en est pas un.
#[derive(Debug, Clone)]
pub struct DenyList {
    /// Identifiants exclus exactement
    pub ids: HashSet<String>,

    /// Fragments (minuscules) qui excluent un actif si son symbole les contient
    pub symbol_fragments: Vec<String>,

    /// Fragments (minuscules) qui excluent un actif si son nom ou son id les contient
    pub name_fragments: Vec<String>,
}

impl DenyList {
    /// Denylist vide, à compléter avec les méthodes `with_*`
    pub fn empty() -> Self {
        Self {
            ids: HashSet::new(),
            symbol_fragments: Vec::new(),
            name_fragments: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.ids.insert(id.to_string());
        self
    }

    pub fn with_symbol_fragment(mut self, fragment: &str) -> Self {
        self.symbol_fragments.push(fragment.to_lowercase());
        self
    }

    pub fn with_name_fragment(mut self, fragment: &str) -> Self {
        self.name_fragments.push(fragment.to_lowercase());
        self
    }

    fn is_stable(&self, asset: &Asset) -> bool {
        let symbol = asset.symbol.to_lowercase();
        self.ids.contains(&asset.id)
            || self.symbol_fragments.iter().any(|f| symbol.contains(f.as_str()))
    }

    fn is_wrapped(&self, asset: &Asset) -> bool {
        let name = asset.name.to_lowercase();
        let id = asset.id.to_lowercase();
        self.name_fragments
            .iter()
            .any(|f| name.contains(f.as_str()) || id.contains(f.as_str()))
    }
}

impl Default for DenyList {
    fn default() -> Self {
        STABLECOINS
            .iter()
            .fold(DenyList::empty(), |list, id| list.with_id(id))
            .with_symbol_fragment("usd")
            .with_name_fragment("wrapped")
    }
}

impl AssetFilter for DenyList {
    fn excludes(&self, asset: &Asset) -> bool {
        self.is_stable(asset) || self.is_wrapped(asset)
    }
}

// ============================================================================
// Structure : Curator
// ============================================================================

/// Filtre, tronque et trie le listing brut
pub struct Curator {
    filter: Box<dyn AssetFilter>,
    priority: Vec<String>,
    max_len: usize,
}

impl Curator {
    pub fn new(filter: Box<dyn AssetFilter>, priority: &[&str], max_len: usize) -> Self {
        Self {
            filter,
            priority: priority.iter().map(|id| id.to_string()).collect(),
            max_len,
        }
    }

    /// Applique filtre → troncature → tri
    ///
    /// La troncature se fait AVANT le tri : on garde les 100 plus grosses
    /// capitalisations, puis on les réordonne pour l'affichage.
    pub fn curate(&self, raw: Vec<Asset>) -> RankedAssetList {
        let raw_len = raw.len();

        let mut kept: Vec<Asset> = raw
            .into_iter()
            .filter(|asset| !self.filter.excludes(asset))
            .take(self.max_len)
            .collect();

        kept.sort_by(|a, b| self.compare(a, b));

        debug!(raw = raw_len, kept = kept.len(), "Curated asset listing");
        RankedAssetList::from_sorted(kept)
    }

    fn priority_index(&self, id: &str) -> Option<usize> {
        self.priority.iter().position(|p| p == id)
    }

    /// Comparateur : priorité d'abord, puis nom affiché
    fn compare(&self, a: &Asset, b: &Asset) -> Ordering {
        match (self.priority_index(&a.id), self.priority_index(&b.id)) {
            (Some(ia), Some(ib)) => ia.cmp(&ib),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_names(&a.name, &b.name),
        }
    }
}

impl Default for Curator {
    fn default() -> Self {
        Self::new(
            Box::new(DenyList::default()),
            &PRIORITY_ASSETS,
            MAX_CURATED_ASSETS,
        )
    }
}

/// Comparaison de noms proche d'un tri "locale" : casse ignorée d'abord,
/// puis la casse départage ("bitcoin" et "Bitcoin" restent voisins)
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Index à sélectionner après un refresh du listing
///
/// - identifiant précédent toujours présent → sa nouvelle position
/// - sinon (pas de sélection, ou identifiant disparu) → premier élément
/// - liste vide → None
pub fn reselect(list: &RankedAssetList, previous_id: Option<&str>) -> Option<usize> {
    if list.is_empty() {
        return None;
    }
    previous_id.and_then(|id| list.position(id)).or(Some(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, name: &str, symbol: &str) -> Asset {
        Asset::new(id, name, symbol, 1.0)
    }

    #[test]
    fn test_stablecoins_and_wrapped_removed() {
        let raw = vec![
            asset("bitcoin", "Bitcoin", "btc"),
            asset("tether", "Tether", "usdt"),
            asset("dai", "Dai", "dai"),
            asset("wrapped-bitcoin", "Wrapped Bitcoin", "wbtc"),
            asset("weth", "WETH Wrapped Ether", "weth"),
            asset("some-token", "Some Token", "xusdx"),
            asset("solana", "Solana", "sol"),
        ];

        let list = Curator::default().curate(raw);

        let ids: Vec<&str> = list.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "solana"]);
        for a in list.iter() {
            assert!(!STABLECOINS.contains(&a.id.as_str()));
            assert!(!a.name.to_lowercase().contains("wrapped"));
            assert!(!a.id.to_lowercase().contains("wrapped"));
        }
    }

    #[test]
    fn test_priority_assets_first_in_order() {
        let raw = vec![
            asset("cardano", "Cardano", "ada"),
            asset("ripple", "XRP", "xrp"),
            asset("aave", "Aave", "aave"),
            asset("ethereum", "Ethereum", "eth"),
            asset("bitcoin", "Bitcoin", "btc"),
        ];

        let list = Curator::default().curate(raw);

        let ids: Vec<&str> = list.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "ethereum", "ripple", "aave", "cardano"]);
    }

    #[test]
    fn test_two_priority_assets_keep_relative_order() {
        let raw = vec![
            asset("ripple", "XRP", "xrp"),
            asset("zcash", "Zcash", "zec"),
            asset("bitcoin", "Bitcoin", "btc"),
        ];

        let list = Curator::default().curate(raw);

        assert_eq!(list.get(0).unwrap().id, "bitcoin");
        assert_eq!(list.get(1).unwrap().id, "ripple");
        assert_eq!(list.get(2).unwrap().id, "zcash");
    }

    #[test]
    fn test_truncated_to_100_before_sorting() {
        // 150 actifs : "coin-000" .. "coin-149", noms décroissants
        let raw: Vec<Asset> = (0..150)
            .map(|i| {
                let name = format!("Coin {:03}", 149 - i);
                asset(&format!("coin-{:03}", i), &name, "cn")
            })
            .collect();

        let list = Curator::default().curate(raw);

        assert_eq!(list.len(), MAX_CURATED_ASSETS);
        // Seuls les 100 premiers (par capitalisation) survivent
        assert!(list.position("coin-099").is_some());
        assert!(list.position("coin-100").is_none());
        // ... puis ils sont triés par nom
        assert_eq!(list.get(0).unwrap().name, "Coin 050");
    }

    #[test]
    fn test_name_ordering_ignores_case_first() {
        let raw = vec![
            asset("b", "bonk", "bonk"),
            asset("a", "Algorand", "algo"),
            asset("c", "Cosmos", "atom"),
        ];

        let list = Curator::default().curate(raw);

        let names: Vec<&str> = list.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Algorand", "bonk", "Cosmos"]);
    }

    #[test]
    fn test_custom_deny_list() {
        let filter = DenyList::empty().with_id("dogecoin");
        let curator = Curator::new(Box::new(filter), &PRIORITY_ASSETS, 10);

        let list = curator.curate(vec![
            asset("dogecoin", "Dogecoin", "doge"),
            asset("tether", "Tether", "usdt"),
        ]);

        assert_eq!(list.len(), 1);
        assert_eq!(list.get(0).unwrap().id, "tether");
    }

    #[test]
    fn test_reselect() {
        let list = Curator::default().curate(vec![
            asset("bitcoin", "Bitcoin", "btc"),
            asset("solana", "Solana", "sol"),
        ]);

        assert_eq!(reselect(&list, Some("solana")), Some(1));
        assert_eq!(reselect(&list, None), Some(0));
        // Identifiant disparu : retour au premier élément
        assert_eq!(reselect(&list, Some("dogecoin")), Some(0));
        assert_eq!(reselect(&RankedAssetList::default(), Some("bitcoin")), None);
    }
}
