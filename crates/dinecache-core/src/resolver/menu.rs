//! Menu fetching on top of the identifier resolver.
//!
//! The set of period ids for a location is unknown until the first menu
//! comes back, so the fetcher starts with a single empty placeholder id
//! (which the API answers with the location's current period) and swaps in
//! the real list exactly once. Callers build their period selector from the
//! list captured at that point; it is not refreshed afterwards.

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::client::decode;
use crate::api::{Fetch, HttpFetcher};
use crate::config::Config;
use crate::models::{MenuResponse, MenuResult};

use super::IdentifierResolver;

pub const RESOLVE_FAILED_MESSAGE: &str = "Couldn't get school and location.";
pub const CONNECT_FAILED_MESSAGE: &str = "Cannot connect.";

/// Snapshot of everything the fetcher has learned this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverState {
    pub school_id: Option<String>,
    pub location_id: Option<String>,
    pub period_ids: Vec<String>,
    /// Last user-facing failure. Not cleared on success.
    pub last_error: Option<String>,
    /// Display name of the resolved location
    pub title: Option<String>,
}

// Fields guarded together; identifier ids live in the resolver's cells.
#[derive(Debug)]
struct MenuState {
    period_ids: Vec<String>,
    last_error: Option<String>,
    title: Option<String>,
    current: Option<MenuResult>,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            period_ids: vec![String::new()],
            last_error: None,
            title: None,
            current: None,
        }
    }
}

impl MenuState {
    fn periods_unknown(&self) -> bool {
        self.period_ids.len() == 1 && self.period_ids[0].is_empty()
    }
}

pub struct MenuFetcher<F> {
    resolver: IdentifierResolver<F>,
    school_slug: String,
    location_name: String,
    state: RwLock<MenuState>,
}

impl MenuFetcher<HttpFetcher> {
    /// Build a fetcher for the school and location named in `config`.
    pub fn from_config(config: &Config) -> Result<Self, crate::api::ApiError> {
        let fetcher = HttpFetcher::with_timeout(config.request_timeout())?;
        let resolver = IdentifierResolver::new(fetcher, &config.api_root);
        Ok(Self::new(resolver, &config.school_slug, &config.location_name))
    }
}

impl<F: Fetch> MenuFetcher<F> {
    pub fn new(resolver: IdentifierResolver<F>, school_slug: &str, location_name: &str) -> Self {
        Self {
            resolver,
            school_slug: school_slug.to_string(),
            location_name: location_name.to_string(),
            state: RwLock::new(MenuState::default()),
        }
    }

    pub fn resolver(&self) -> &IdentifierResolver<F> {
        &self.resolver
    }

    /// Fetch the menu for the period at `period_index` on `date`.
    ///
    /// Returns `None` on any failure, with the reason available from
    /// `last_error`.
    ///
    /// # Panics
    ///
    /// Panics if `period_index` is outside the current period list. Before
    /// the first successful fetch only index 0 is valid.
    pub async fn get_menu(&self, period_index: usize, date: NaiveDate) -> Option<MenuResult> {
        let period_id = {
            let state = self.state.read().await;
            match state.period_ids.get(period_index) {
                Some(id) => id.clone(),
                None => panic!(
                    "period index {} out of range ({} periods known)",
                    period_index,
                    state.period_ids.len()
                ),
            }
        };

        let Some(location) = self
            .resolver
            .resolve_location_entry(&self.school_slug, &self.location_name)
            .await
        else {
            self.fail(RESOLVE_FAILED_MESSAGE.to_string()).await;
            return None;
        };
        self.state.write().await.title = Some(location.name.clone());

        let url = self.resolver.endpoints().menu(&location.id, &period_id, date);
        let bytes = match self.resolver.fetcher().get(&url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(url = %url, error = %e, "Menu request failed");
                self.fail(CONNECT_FAILED_MESSAGE.to_string()).await;
                return None;
            }
        };

        let response: MenuResponse = match decode(&bytes, "menu") {
            Ok(response) => response,
            Err(e) => {
                warn!(date = %date, error = %e, "No usable menu in response");
                self.fail(no_menu_message(date)).await;
                return None;
            }
        };

        let mut state = self.state.write().await;
        if state.periods_unknown() && !response.periods.is_empty() {
            state.period_ids = response.period_ids();
            info!(count = state.period_ids.len(), "Captured period list");
        }

        let result = response.into_result();
        state.current = Some(result.clone());
        Some(result)
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    pub async fn period_ids(&self) -> Vec<String> {
        self.state.read().await.period_ids.clone()
    }

    /// Most recent successful result
    pub async fn current(&self) -> Option<MenuResult> {
        self.state.read().await.current.clone()
    }

    pub async fn title(&self) -> Option<String> {
        self.state.read().await.title.clone()
    }

    pub async fn state(&self) -> ResolverState {
        let school_id = self.resolver.cached_school(&self.school_slug).await;
        let location_id = self
            .resolver
            .cached_location(&self.school_slug, &self.location_name)
            .await;

        let state = self.state.read().await;
        ResolverState {
            school_id,
            location_id,
            period_ids: state.period_ids.clone(),
            last_error: state.last_error.clone(),
            title: state.title.clone(),
        }
    }

    async fn fail(&self, message: String) {
        self.state.write().await.last_error = Some(message);
    }
}

fn no_menu_message(date: NaiveDate) -> String {
    format!("No menu available for {}.", date.format("%B %-d, %Y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::testing::{FakeFetcher, Reply};

    const ROOT: &str = "http://dine.test";

    const MENU: &str = r#"{
        "periods": [
            {"id":"P1","name":"Breakfast","sort_order":0},
            {"id":"P2","name":"Lunch","sort_order":1}
        ],
        "menu": {"periods": {"categories": [
            {"id":"C1","name":"Entrees","items":[
                {"id":"I1","name":"Pancakes","desc":"~","nutrients":[],"calories":350,"portion":"3 each"}
            ]}
        ]}}
    }"#;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 4, 4).unwrap()
    }

    fn menu_url(period: &str) -> String {
        format!("{ROOT}/v1/location/L1/periods/{period}?platform=0&date=20230404")
    }

    fn fixture() -> FakeFetcher {
        let fetcher = FakeFetcher::new();
        fetcher.route(
            &format!("{ROOT}/v1/sites/public_ca"),
            Reply::json(r#"{"sites":[{"slug":"acadiau","id":"S1"}]}"#),
        );
        fetcher.route(
            &format!("{ROOT}/v1/locations/buildings_locations?site_id=S1"),
            Reply::json(r#"{"standalone_locations":[{"name":"Wheelock Dining Hall","id":"L1"}]}"#),
        );
        fetcher.route(&menu_url(""), Reply::json(MENU));
        fetcher.route(&menu_url("P1"), Reply::json(MENU));
        fetcher.route(&menu_url("P2"), Reply::json(MENU));
        fetcher
    }

    fn menu_fetcher(fetcher: &FakeFetcher, slug: &str, location: &str) -> MenuFetcher<FakeFetcher> {
        MenuFetcher::new(IdentifierResolver::new(fetcher.clone(), ROOT), slug, location)
    }

    #[tokio::test]
    async fn test_first_fetch_captures_periods() {
        let fetcher = fixture();
        let menus = menu_fetcher(&fetcher, "acadiau", "Wheelock Dining Hall");
        assert_eq!(menus.period_ids().await, vec![String::new()]);

        let result = menus.get_menu(0, date()).await.unwrap();
        assert_eq!(result.periods.len(), 2);
        assert_eq!(result.categories.len(), 1);
        assert_eq!(menus.period_ids().await, vec!["P1".to_string(), "P2".to_string()]);

        let state = menus.state().await;
        assert_eq!(state.school_id.as_deref(), Some("S1"));
        assert_eq!(state.location_id.as_deref(), Some("L1"));
        assert_eq!(state.title.as_deref(), Some("Wheelock Dining Hall"));
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn test_later_fetch_uses_captured_period_id() {
        let fetcher = fixture();
        let menus = menu_fetcher(&fetcher, "acadiau", "Wheelock Dining Hall");
        menus.get_menu(0, date()).await.unwrap();

        // Only the P2 route answers now
        fetcher.route(&menu_url(""), Reply::Status(500));
        fetcher.route(&menu_url("P1"), Reply::Status(500));
        assert!(menus.get_menu(1, date()).await.is_some());
        // sites + locations + 2 menus
        assert_eq!(fetcher.calls(), 4);
    }

    #[tokio::test]
    async fn test_periods_replaced_only_once() {
        let fetcher = fixture();
        let menus = menu_fetcher(&fetcher, "acadiau", "Wheelock Dining Hall");
        menus.get_menu(0, date()).await.unwrap();

        let three = r#"{"periods":[{"id":"X1","name":"A","sort_order":0},{"id":"X2","name":"B","sort_order":1},{"id":"X3","name":"C","sort_order":2}],
            "menu":{"periods":{"categories":[]}}}"#;
        fetcher.route(&menu_url("P1"), Reply::json(three));

        let result = menus.get_menu(0, date()).await.unwrap();
        assert_eq!(result.periods.len(), 3);
        assert_eq!(menus.period_ids().await, vec!["P1".to_string(), "P2".to_string()]);
        assert_eq!(menus.current().await.unwrap().periods.len(), 3);
    }

    #[tokio::test]
    async fn test_resolve_failure_message() {
        let fetcher = fixture();
        let menus = menu_fetcher(&fetcher, "acadiau", "Nowhere Cafe");

        assert!(menus.get_menu(0, date()).await.is_none());
        assert_eq!(menus.last_error().await.as_deref(), Some(RESOLVE_FAILED_MESSAGE));
        assert!(menus.title().await.is_none());
    }

    #[tokio::test]
    async fn test_transport_and_decode_messages_differ() {
        let fetcher = fixture();
        let menus = menu_fetcher(&fetcher, "acadiau", "Wheelock Dining Hall");

        fetcher.route(&menu_url(""), Reply::Status(502));
        assert!(menus.get_menu(0, date()).await.is_none());
        let transport = menus.last_error().await.unwrap();
        assert_eq!(transport, CONNECT_FAILED_MESSAGE);

        fetcher.route(&menu_url(""), Reply::json(r#"{"status":"error","periods":[]}"#));
        assert!(menus.get_menu(0, date()).await.is_none());
        let decode = menus.last_error().await.unwrap();
        assert_eq!(decode, "No menu available for April 4, 2023.");
        assert_ne!(transport, decode);

        // failures leave the placeholder in place
        assert_eq!(menus.period_ids().await, vec![String::new()]);
        assert!(menus.current().await.is_none());
    }

    #[tokio::test]
    async fn test_last_error_is_stale_after_success() {
        let fetcher = fixture();
        let menus = menu_fetcher(&fetcher, "acadiau", "Wheelock Dining Hall");

        fetcher.route(&menu_url(""), Reply::Status(500));
        assert!(menus.get_menu(0, date()).await.is_none());

        fetcher.route(&menu_url(""), Reply::json(MENU));
        assert!(menus.get_menu(0, date()).await.is_some());
        assert_eq!(menus.last_error().await.as_deref(), Some(CONNECT_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_empty_period_list_keeps_placeholder() {
        let fetcher = fixture();
        fetcher.route(
            &menu_url(""),
            Reply::json(r#"{"periods":[],"menu":{"periods":{"categories":[]}}}"#),
        );
        let menus = menu_fetcher(&fetcher, "acadiau", "Wheelock Dining Hall");

        assert!(menus.get_menu(0, date()).await.is_some());
        assert_eq!(menus.period_ids().await, vec![String::new()]);
    }

    #[tokio::test]
    #[should_panic(expected = "period index 1 out of range")]
    async fn test_out_of_range_period_panics() {
        let fetcher = fixture();
        let menus = menu_fetcher(&fetcher, "acadiau", "Wheelock Dining Hall");
        menus.get_menu(1, date()).await;
    }

    #[test]
    fn test_no_menu_message_format() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(no_menu_message(date), "No menu available for December 25, 2024.");
    }
}
