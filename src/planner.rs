// src/planner.rs
// Events, sales transactions and the pre-planning of an event's games with
// difficulty-weighted prize allocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::GameDoc;
use crate::pattern::{CUSTOM_PATTERN_DIFFICULTY, PatternKind};
use crate::store::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Upcoming,
    Active,
    Completed,
}

/// One sales record appended onto the owning event document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub item_type: String,
    pub quantity: u32,
    pub price: f64,
    pub total_amount: f64,
    #[serde(default)]
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(item_type: &str, quantity: u32, price: f64, notes: &str) -> Self {
        Transaction {
            item_type: item_type.to_string(),
            quantity,
            price,
            total_amount: f64::from(quantity) * price,
            notes: notes.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Persisted event document (events/{id}), the container of a night's games.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDoc {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub total_games: u32,
    pub total_prize_pool: Option<f64>,
    pub status: EventStatus,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl EventDoc {
    pub fn new(
        name: &str,
        location: &str,
        date: DateTime<Utc>,
        total_games: u32,
        total_prize_pool: Option<f64>,
    ) -> Self {
        EventDoc {
            id: String::new(),
            name: name.to_string(),
            location: location.to_string(),
            date,
            total_games,
            total_prize_pool,
            status: EventStatus::Upcoming,
            transactions: Vec::new(),
            created_by: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn total_sales(&self) -> f64 {
        self.transactions.iter().map(|t| t.total_amount).sum()
    }
}

/// Pattern metadata the planner and game setup need: display name,
/// description and the difficulty weight.
pub struct PatternInfo {
    pub name: String,
    pub description: String,
    pub difficulty: u8,
}

pub fn pattern_info(store: &dyn DocumentStore, pattern_id: &str) -> Result<PatternInfo, GameError> {
    if let Some(kind) = PatternKind::from_id(pattern_id) {
        return Ok(PatternInfo {
            name: kind.name().to_string(),
            description: kind.description().to_string(),
            difficulty: kind.difficulty(),
        });
    }
    if let Some(doc) = store.get_pattern(pattern_id)? {
        return Ok(PatternInfo {
            difficulty: doc.difficulty(),
            description: doc.description,
            name: doc.name,
        });
    }
    // Stale pattern reference: plan with the medium default rather than
    // failing the whole event.
    Ok(PatternInfo {
        name: "Unknown Pattern".to_string(),
        description: String::new(),
        difficulty: CUSTOM_PATTERN_DIFFICULTY,
    })
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Plan a full event: one game per chosen pattern, the prize pool split by
/// pattern difficulty weight, and the event plus every game persisted in a
/// single batched write.
pub fn plan_event(
    store: &dyn DocumentStore,
    name: &str,
    location: &str,
    date: DateTime<Utc>,
    total_prize_pool: f64,
    pattern_ids: &[String],
) -> Result<(EventDoc, Vec<GameDoc>), GameError> {
    let event = EventDoc::new(
        name,
        location,
        date,
        pattern_ids.len() as u32,
        Some(total_prize_pool),
    );

    let infos: Vec<PatternInfo> = pattern_ids
        .iter()
        .map(|id| pattern_info(store, id))
        .collect::<Result<_, _>>()?;
    let total_difficulty: u32 = infos.iter().map(|info| u32::from(info.difficulty)).sum();

    let mut games = Vec::with_capacity(infos.len());
    for (index, (pattern_id, info)) in pattern_ids.iter().zip(&infos).enumerate() {
        let percentage = if total_difficulty == 0 {
            0.0
        } else {
            f64::from(info.difficulty) / f64::from(total_difficulty) * 100.0
        };
        let amount = round_cents(total_prize_pool * percentage / 100.0);

        let mut game = GameDoc::new(
            "", // assigned by the batched write
            name,
            index as u32 + 1,
            pattern_id,
            &info.name,
            &info.description,
            info.difficulty,
            &format!("${amount:.2}"),
        );
        game.allocated_percentage = Some((percentage * 10.0).round() / 10.0);
        game.allocated_amount = Some(amount);
        games.push(game);
    }

    store.create_event_with_games(event, games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;
    use crate::store::MemoryStore;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_allocation_weighted_by_difficulty() {
        let store = MemoryStore::new();
        let (event, games) = plan_event(
            &store,
            "Friday Night",
            "Elks Lodge",
            Utc::now(),
            100.0,
            &ids(&["horizontal", "blackout"]),
        )
        .unwrap();

        assert_eq!(event.total_games, 2);
        assert_eq!(event.status, EventStatus::Upcoming);

        // Weights 3 and 10 out of 13.
        assert_eq!(games[0].allocated_amount, Some(23.08));
        assert_eq!(games[1].allocated_amount, Some(76.92));
        assert_eq!(games[0].allocated_percentage, Some(23.1));
        assert_eq!(games[1].allocated_percentage, Some(76.9));
        assert_eq!(games[1].prize, "$76.92");

        let allocated: f64 = games.iter().filter_map(|g| g.allocated_amount).sum();
        assert!((allocated - 100.0).abs() < 0.05);
    }

    #[test]
    fn test_equal_difficulties_split_evenly() {
        let store = MemoryStore::new();
        let (_, games) = plan_event(
            &store,
            "Even Split",
            "Hall",
            Utc::now(),
            90.0,
            &ids(&["horizontal", "vertical", "horizontal"]),
        )
        .unwrap();

        for game in &games {
            assert_eq!(game.allocated_amount, Some(30.0));
        }
    }

    #[test]
    fn test_planned_games_are_ready_with_codes() {
        let store = MemoryStore::new();
        let (event, games) = plan_event(
            &store,
            "Launch",
            "Hall",
            Utc::now(),
            50.0,
            &ids(&["corners", "diagonal", "x_pattern"]),
        )
        .unwrap();

        let mut codes = std::collections::HashSet::new();
        for (index, game) in games.iter().enumerate() {
            assert_eq!(game.status, GameStatus::Ready);
            assert_eq!(game.game_number, index as u32 + 1);
            assert_eq!(game.event_id, event.id);
            assert_eq!(game.verification_code.len(), 6);
            codes.insert(game.verification_code.clone());
        }
        assert_eq!(codes.len(), games.len());
    }

    #[test]
    fn test_unknown_pattern_planned_with_default_difficulty() {
        let store = MemoryStore::new();
        let (_, games) = plan_event(
            &store,
            "Odd One",
            "Hall",
            Utc::now(),
            100.0,
            &ids(&["no_such_pattern", "corners"]),
        )
        .unwrap();

        assert_eq!(games[0].pattern_name, "Unknown Pattern");
        assert_eq!(games[0].pattern_difficulty, 5);
        assert_eq!(games[1].pattern_difficulty, 5);
        assert_eq!(games[0].allocated_amount, Some(50.0));
    }

    #[test]
    fn test_transactions_accumulate_on_event() {
        let store = MemoryStore::new();
        let (mut event, _) = plan_event(&store, "Sales", "Hall", Utc::now(), 10.0, &ids(&["corners"]))
            .unwrap();

        event.transactions.push(Transaction::new("Card Pack", 3, 5.0, ""));
        event.transactions.push(Transaction::new("Dauber", 2, 1.5, "blue"));
        store.save_event(&event).unwrap();

        let reloaded = store.get_event(&event.id).unwrap();
        assert_eq!(reloaded.transactions.len(), 2);
        assert_eq!(reloaded.transactions[0].total_amount, 15.0);
        assert_eq!(reloaded.total_sales(), 18.0);
    }
}
