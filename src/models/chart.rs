// ============================================================================
// Structures : ChartPoint et ChartSeries
// ============================================================================
// Historique de prix sur 7 jours pour l'actif sélectionné
// Chargé uniquement quand la vue graphique est ouverte
// ============================================================================

use chrono::{DateTime, Local, Utc};

use crate::models::FiatCurrency;

/// Fenêtre de l'historique, en jours
pub const CHART_WINDOW_DAYS: u32 = 7;

/// Un échantillon (timestamp, prix)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl ChartPoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Date locale affichée sous le graphique (ex: "18/10/2026")
    pub fn date_label(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%d/%m/%Y")
            .to_string()
    }
}

/// Série chronologique pour un actif et une devise
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub asset_id: String,
    pub fiat: FiatCurrency,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn new(asset_id: String, fiat: FiatCurrency) -> Self {
        Self {
            asset_id,
            fiat,
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, point: ChartPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&ChartPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&ChartPoint> {
        self.points.last()
    }

    /// (min, max) des prix, None si la série est vide
    ///
    /// CONCEPT RUST : fold pour calculer min et max en un seul passage
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points.iter().fold(
            (f64::MAX, f64::MIN),
            |(min, max), p| (min.min(p.price), max.max(p.price)),
        ))
    }

    /// Variation en % entre le premier et le dernier échantillon
    pub fn change_percent(&self) -> Option<f64> {
        let first = self.first()?.price;
        let last = self.last()?.price;
        if first == 0.0 {
            return None;
        }
        Some((last - first) / first * 100.0)
    }
}
