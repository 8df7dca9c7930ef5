use crate::models::{
    BetOffer, NormalizedEvent, RawEventEnvelope, MATCH_ODDS_TYPE_ID, STATE_NOT_STARTED,
};
use regex::Regex;
use std::sync::OnceLock;

fn seed_suffix() -> &'static Regex {
    static SEED: OnceLock<Regex> = OnceLock::new();
    SEED.get_or_init(|| Regex::new(r"\(\d+\)").expect("valid seed pattern"))
}

/// Strip parenthesized numbers such as "(2)" and surrounding whitespace
pub fn clean_team_name(name: &str) -> String {
    seed_suffix().replace_all(name, "").trim().to_string()
}

/// Home, draw and away odds of the first match odds offer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchOdds {
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
}

/// Only the first offer of the match odds type is read. Later offers of
/// the same type are ignored, never merged.
pub fn extract_match_odds(offers: &[BetOffer]) -> MatchOdds {
    let mut odds = MatchOdds::default();

    let Some(offer) = offers.iter().find(|offer| {
        offer.bet_offer_type.as_ref().and_then(|t| t.id) == Some(MATCH_ODDS_TYPE_ID)
    }) else {
        return odds;
    };

    for outcome in offer.outcomes.iter().flatten() {
        let Some(raw) = outcome.odds else {
            continue;
        };
        let decimal = Some(raw / 1000.0);
        match outcome.outcome_type.as_deref() {
            Some("OT_ONE") => odds.home = decimal,
            Some("OT_CROSS") => odds.draw = decimal,
            Some("OT_TWO") => odds.away = decimal,
            _ => {}
        }
    }

    odds
}

/// Normalize a single envelope; `None` unless the event has not started
/// and has an id
pub fn normalize_event(envelope: &RawEventEnvelope, sport: &str) -> Option<NormalizedEvent> {
    let event = envelope.event.as_ref()?;
    if event.state.as_deref() != Some(STATE_NOT_STARTED) {
        return None;
    }
    let id = event.id?;

    let odds = extract_match_odds(envelope.bet_offers.as_deref().unwrap_or_default());

    Some(NormalizedEvent {
        id,
        sport: sport.to_string(),
        home_name: clean_team_name(event.home_name.as_deref().unwrap_or_default()),
        away_name: clean_team_name(event.away_name.as_deref().unwrap_or_default()),
        start: event.start.clone().unwrap_or_default(),
        group: event.group.clone().unwrap_or_default(),
        odds_1: odds.home,
        odds_x: odds.draw,
        odds_2: odds.away,
    })
}

/// Normalize a fetched batch for one sport. Order is kept and duplicate
/// ids are left for the store to absorb.
pub fn normalize_events(envelopes: &[RawEventEnvelope], sport: &str) -> Vec<NormalizedEvent> {
    envelopes
        .iter()
        .filter_map(|envelope| normalize_event(envelope, sport))
        .collect()
}
