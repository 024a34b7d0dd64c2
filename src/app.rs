// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état complet d'une session de conversion
//
// CONCEPTS RUST :
// 1. State Management : un seul record pour montant, devise, liste,
//    sélection, graphique, erreur
// 2. Transitions explicites : chaque action utilisateur est une méthode
//    qui retourne éventuellement une commande de fetch à envoyer au worker
// 3. Tokens de requête : chaque fetch porte un numéro croissant, seule la
//    réponse la plus récente est appliquée (pas de données périmées)
//
// PATTERN : "Application State"
// - L'UI lit depuis App
// - Toutes les modifications passent par les méthodes de App
// - Le worker ne touche jamais App : il renvoie des AppResult
// ============================================================================

use chrono::{DateTime, Local};
use tracing::{debug, error, info, warn};

use crate::converter;
use crate::curator::{self, Curator};
use crate::models::{Asset, ChartSeries, FiatCurrency, RankedAssetList, CHART_WINDOW_DAYS};

// ============================================================================
// Enum : Screen
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : "You Pay" / "You Receive"
    Converter,

    /// Vue graphique : tendance 7 jours de l'actif sélectionné
    ChartView,
}

/// Thème d'affichage (purement cosmétique)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

// ============================================================================
// Tokens de requête
// ============================================================================
// CONCEPT : Séquencement des réponses
// - Deux changements de devise rapides lancent deux fetchs
// - Le premier peut répondre APRÈS le second
// - Sans token, il écraserait la liste avec des prix dans la mauvaise devise
// ============================================================================

/// Identifiant monotone d'une requête
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Émet des tokens et retient le dernier en attente
#[derive(Debug, Default)]
struct RequestSequencer {
    issued: u64,
    pending: Option<RequestToken>,
}

impl RequestSequencer {
    fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.pending = Some(token);
        token
    }

    /// Accepte la réponse si elle correspond au dernier token émis
    fn complete(&mut self, token: RequestToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Oublie la requête en cours : sa réponse sera ignorée
    fn invalidate(&mut self) {
        self.pending = None;
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

// ============================================================================
// Commandes et résultats échangés avec le worker
// ============================================================================

/// Commandes envoyées au worker pour exécuter un fetch
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Charger le listing dans une devise
    FetchListing {
        token: RequestToken,
        fiat: FiatCurrency,
    },

    /// Charger l'historique d'un actif
    FetchChart {
        token: RequestToken,
        asset_id: String,
        fiat: FiatCurrency,
        days: u32,
    },
}

/// Résultats renvoyés par le worker
#[derive(Debug)]
pub enum AppResult {
    /// Listing brut reçu (pas encore filtré)
    ListingLoaded {
        token: RequestToken,
        assets: Vec<Asset>,
    },

    /// Échec du listing (statut non-2xx ou erreur réseau)
    ListingFailed { token: RequestToken, error: String },

    /// Historique reçu
    ChartLoaded {
        token: RequestToken,
        series: ChartSeries,
    },

    /// Échec de l'historique (silencieux pour l'utilisateur)
    ChartFailed { token: RequestToken, error: String },
}

// ============================================================================
// Structure : App
// ============================================================================

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Thème clair / sombre
    pub theme: Theme,

    /// Devise fiat active
    pub fiat: FiatCurrency,

    /// Montant saisi, toujours conforme à `converter::is_decimal_text`
    pub amount: String,

    /// Liste filtrée et triée
    pub assets: RankedAssetList,

    /// Index de l'actif sélectionné dans `assets`
    pub selected_index: Option<usize>,

    /// Un fetch du listing est en cours
    pub is_loading: bool,

    /// Message d'erreur du dernier fetch du listing
    /// La liste et la sélection précédentes restent affichables dessous.
    pub error: Option<String>,

    /// Heure du dernier listing reçu
    pub last_updated: Option<DateTime<Local>>,

    /// Historique affiché dans la vue graphique
    pub chart: Option<ChartSeries>,

    /// Un fetch d'historique est en cours
    pub chart_loading: bool,

    /// Affiche le lien de don dans le footer
    pub show_payment_link: bool,

    /// Two-step quit : première pression de 'q' → true
    pub confirm_quit: bool,

    curator: Curator,
    listing_requests: RequestSequencer,
    chart_requests: RequestSequencer,
}

impl App {
    /// Crée une session vide dans la devise donnée
    pub fn new(fiat: FiatCurrency) -> Self {
        Self::with_curator(Curator::default(), fiat)
    }

    /// Crée une session avec un curateur personnalisé
    pub fn with_curator(curator: Curator, fiat: FiatCurrency) -> Self {
        Self {
            running: true,
            current_screen: Screen::Converter,
            theme: Theme::default(),
            fiat,
            amount: "0".to_string(),
            assets: RankedAssetList::default(),
            selected_index: None,
            is_loading: false,
            error: None,
            last_updated: None,
            chart: None,
            chart_loading: false,
            show_payment_link: false,
            confirm_quit: false,
            curator,
            listing_requests: RequestSequencer::default(),
            chart_requests: RequestSequencer::default(),
        }
    }

    // ========================================================================
    // Cycle de vie
    // ========================================================================

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// Premier chargement au démarrage
    pub fn start(&mut self) -> AppCommand {
        info!(fiat = %self.fiat, "Initial listing load");
        self.request_listing()
    }

    /// Refresh manuel (ou "Try again" depuis le panneau d'erreur)
    ///
    /// Ignoré si un fetch du listing est déjà en cours.
    pub fn refresh(&mut self) -> Option<AppCommand> {
        if self.is_loading {
            debug!("Refresh ignored, listing fetch already in flight");
            return None;
        }
        info!(fiat = %self.fiat, "Manual refresh");
        Some(self.request_listing())
    }

    fn request_listing(&mut self) -> AppCommand {
        self.is_loading = true;
        self.error = None;
        AppCommand::FetchListing {
            token: self.listing_requests.issue(),
            fiat: self.fiat,
        }
    }

    /// Change de devise fiat et relance le listing
    ///
    /// Le graphique éventuel est vidé : ses prix sont dans l'ancienne devise.
    /// Il sera rechargé quand le nouveau listing arrivera.
    pub fn select_fiat(&mut self, fiat: FiatCurrency) -> Option<AppCommand> {
        if fiat == self.fiat {
            return None;
        }
        info!(from = %self.fiat, to = %fiat, "Fiat currency changed");
        self.fiat = fiat;
        self.discard_chart();
        self.chart_loading = self.is_on_chart();
        Some(self.request_listing())
    }

    pub fn next_fiat(&mut self) -> Option<AppCommand> {
        self.select_fiat(self.fiat.next())
    }

    pub fn previous_fiat(&mut self) -> Option<AppCommand> {
        self.select_fiat(self.fiat.previous())
    }

    // ========================================================================
    // Sélection de l'actif
    // ========================================================================

    /// Actif sélectionné, None tant que le premier listing n'est pas arrivé
    pub fn selected_asset(&self) -> Option<&Asset> {
        self.selected_index.and_then(|i| self.assets.get(i))
    }

    /// Sélectionne l'actif à l'index donné
    ///
    /// Si la vue graphique est ouverte, l'historique du nouvel actif est
    /// demandé immédiatement.
    pub fn select_asset(&mut self, index: usize) -> Option<AppCommand> {
        if index >= self.assets.len() || self.selected_index == Some(index) {
            return None;
        }
        self.selected_index = Some(index);
        if let Some(asset) = self.selected_asset() {
            debug!(asset = %asset.id, "Asset selected");
        }

        self.discard_chart();
        if self.is_on_chart() {
            self.request_chart()
        } else {
            None
        }
    }

    /// Actif suivant (saturating : reste sur le dernier)
    pub fn next_asset(&mut self) -> Option<AppCommand> {
        let max_index = self.assets.len().saturating_sub(1);
        let next = self.selected_index.map_or(0, |i| (i + 1).min(max_index));
        self.select_asset(next)
    }

    /// Actif précédent (saturating : reste sur le premier)
    pub fn previous_asset(&mut self) -> Option<AppCommand> {
        let previous = self.selected_index.map_or(0, |i| i.saturating_sub(1));
        self.select_asset(previous)
    }

    // ========================================================================
    // Montant
    // ========================================================================

    /// Ajoute un caractère au montant si le résultat reste valide
    ///
    /// Retourne false si la frappe est rejetée (le champ garde sa valeur).
    /// Un "0" seul est remplacé par le premier chiffre tapé.
    pub fn push_amount_char(&mut self, c: char) -> bool {
        let candidate = if self.amount == "0" && c.is_ascii_digit() {
            c.to_string()
        } else {
            format!("{}{}", self.amount, c)
        };

        if converter::is_decimal_text(&candidate) {
            self.amount = candidate;
            true
        } else {
            debug!(key = %c, amount = %self.amount, "Rejected amount keystroke");
            false
        }
    }

    /// Supprime le dernier caractère du montant
    pub fn pop_amount_char(&mut self) {
        self.amount.pop();
    }

    /// Résultat de la conversion pour l'affichage "You Receive"
    pub fn conversion(&self) -> String {
        converter::convert(&self.amount, self.selected_asset().map(|a| a.current_price))
    }

    // ========================================================================
    // Vue graphique
    // ========================================================================

    /// Ouvre la vue graphique et demande l'historique
    pub fn open_chart(&mut self) -> Option<AppCommand> {
        let asset_id = self.selected_asset()?.id.clone();
        info!(asset = %asset_id, "User opened chart view");
        self.current_screen = Screen::ChartView;
        self.request_chart()
    }

    /// Ferme la vue graphique, l'historique est jeté
    pub fn close_chart(&mut self) {
        debug!("User closed chart view");
        self.current_screen = Screen::Converter;
        self.discard_chart();
    }

    fn request_chart(&mut self) -> Option<AppCommand> {
        let asset_id = self.selected_asset()?.id.clone();
        self.chart = None;
        self.chart_loading = true;
        Some(AppCommand::FetchChart {
            token: self.chart_requests.issue(),
            asset_id,
            fiat: self.fiat,
            days: CHART_WINDOW_DAYS,
        })
    }

    fn discard_chart(&mut self) {
        self.chart = None;
        self.chart_loading = false;
        self.chart_requests.invalidate();
    }

    pub fn is_on_converter(&self) -> bool {
        self.current_screen == Screen::Converter
    }

    pub fn is_on_chart(&self) -> bool {
        self.current_screen == Screen::ChartView
    }

    // ========================================================================
    // Cosmétique
    // ========================================================================

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn toggle_payment_link(&mut self) {
        self.show_payment_link = !self.show_payment_link;
    }

    // ========================================================================
    // Application des résultats du worker
    // ========================================================================

    /// Applique un résultat du worker
    ///
    /// Les résultats dont le token n'est pas le dernier émis sont ignorés.
    /// Peut retourner une commande de suivi (recharger l'historique quand la
    /// vue graphique est ouverte et que le listing a changé).
    pub fn apply_result(&mut self, result: AppResult) -> Option<AppCommand> {
        match result {
            AppResult::ListingLoaded { token, assets } => {
                if !self.listing_requests.complete(token) {
                    debug!(?token, "Discarding stale listing response");
                    return None;
                }
                self.apply_listing(assets)
            }

            AppResult::ListingFailed { token, error } => {
                if !self.listing_requests.complete(token) {
                    debug!(?token, "Discarding stale listing failure");
                    return None;
                }
                warn!(error = %error, "Listing fetch failed, keeping previous list");
                self.is_loading = false;
                self.error = Some(error);
                // Le graphique attendait un listing qui n'arrivera pas
                if self.is_on_chart() && !self.chart_requests.is_pending() {
                    self.chart_loading = false;
                }
                None
            }

            AppResult::ChartLoaded { token, series } => {
                if !self.chart_requests.complete(token) {
                    debug!(?token, "Discarding stale chart response");
                    return None;
                }
                info!(asset = %series.asset_id, points = series.len(), "Chart data loaded");
                self.chart = Some(series);
                self.chart_loading = false;
                None
            }

            AppResult::ChartFailed { token, error } => {
                if !self.chart_requests.complete(token) {
                    debug!(?token, "Discarding stale chart failure");
                    return None;
                }
                error!(error = %error, "Failed to load chart");
                self.chart = None;
                self.chart_loading = false;
                None
            }
        }
    }

    /// Remplace la liste et rebinde la sélection
    fn apply_listing(&mut self, raw: Vec<Asset>) -> Option<AppCommand> {
        let previous_id = self.selected_asset().map(|a| a.id.clone());

        let list = self.curator.curate(raw);
        let selected = curator::reselect(&list, previous_id.as_deref());

        self.assets = list;
        self.selected_index = selected;
        self.is_loading = false;
        self.error = None;
        self.last_updated = Some(Local::now());

        let current_id = self.selected_asset().map(|a| a.id.clone());
        if previous_id.is_some() && previous_id != current_id {
            warn!(previous = ?previous_id, current = ?current_id, "Selected asset left the listing, falling back to first");
        }
        info!(assets = self.assets.len(), selected = ?current_id, "Listing applied");

        if self.is_on_chart() {
            if self.selected_asset().is_some() {
                return self.request_chart();
            }
            self.close_chart();
        }
        None
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(FiatCurrency::default())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
