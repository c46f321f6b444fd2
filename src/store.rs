// src/store.rs
// Document store abstraction and the in-memory implementation.
//
// The store is an explicitly injected dependency of every controller. The
// hosted backend (auth, durability, realtime delivery) sits behind this
// trait; MemoryStore stands in for it with the same observable semantics:
// full-document reads, last-write-wins saves, and push updates that replace
// the subscriber's copy wholesale.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::watch;

use crate::error::GameError;
use crate::game::{GameDoc, GameStatus};
use crate::pattern::{PatternDef, PatternDoc};
use crate::planner::EventDoc;

pub trait DocumentStore: Send + Sync {
    fn get_game(&self, id: &str) -> Result<GameDoc, GameError>;
    /// Insert a new game, assigning its id.
    fn insert_game(&self, game: GameDoc) -> Result<GameDoc, GameError>;
    /// Replace the stored document and push it to subscribers.
    fn save_game(&self, game: &GameDoc) -> Result<(), GameError>;
    fn find_game_by_code(&self, code: &str) -> Result<GameDoc, GameError>;
    fn list_games(&self, status: Option<GameStatus>) -> Result<Vec<GameDoc>, GameError>;
    fn list_event_games(&self, event_id: &str) -> Result<Vec<GameDoc>, GameError>;

    fn get_event(&self, id: &str) -> Result<EventDoc, GameError>;
    fn save_event(&self, event: &EventDoc) -> Result<(), GameError>;
    /// Batched write: the event and all its planned games land together.
    fn create_event_with_games(
        &self,
        event: EventDoc,
        games: Vec<GameDoc>,
    ) -> Result<(EventDoc, Vec<GameDoc>), GameError>;

    fn get_pattern(&self, id: &str) -> Result<Option<PatternDoc>, GameError>;
    fn list_patterns(&self) -> Result<Vec<PatternDoc>, GameError>;
    fn insert_pattern(&self, pattern: PatternDoc) -> Result<PatternDoc, GameError>;

    /// Scoped subscription to one game's pushed updates. The receiver holds
    /// the current document and observes every subsequent save; dropping it
    /// unsubscribes.
    fn subscribe_game(&self, id: &str) -> Result<watch::Receiver<GameDoc>, GameError>;
}

/// Resolve a game's pattern reference for evaluation: a stored custom
/// pattern wins, then the built-in set, then the horizontal fallback for
/// unrecognized ids.
pub fn resolve_pattern(store: &dyn DocumentStore, pattern_id: &str) -> Result<PatternDef, GameError> {
    if let Some(doc) = store.get_pattern(pattern_id)? {
        return Ok(PatternDef::from_grid(&doc.grid));
    }
    Ok(PatternDef::from_id(pattern_id))
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}_{:08x}", rand::random::<u32>())
}

/// In-memory document store keyed by collection and id.
pub struct MemoryStore {
    games: Mutex<HashMap<String, GameDoc>>,
    events: Mutex<HashMap<String, EventDoc>>,
    patterns: Mutex<HashMap<String, PatternDoc>>,
    watchers: Mutex<HashMap<String, watch::Sender<GameDoc>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            games: Mutex::new(HashMap::new()),
            events: Mutex::new(HashMap::new()),
            patterns: Mutex::new(HashMap::new()),
            watchers: Mutex::new(HashMap::new()),
        }
    }

    fn notify(&self, game: &GameDoc) -> Result<(), GameError> {
        let watchers = self
            .watchers
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock watcher registry".to_string()))?;
        if let Some(sender) = watchers.get(&game.id) {
            sender.send_replace(game.clone());
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn get_game(&self, id: &str) -> Result<GameDoc, GameError> {
        let games = self
            .games
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock games collection".to_string()))?;
        games
            .get(id)
            .cloned()
            .ok_or_else(|| GameError::NotFound(format!("game '{id}'")))
    }

    fn insert_game(&self, mut game: GameDoc) -> Result<GameDoc, GameError> {
        let mut games = self
            .games
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock games collection".to_string()))?;
        game.id = new_id("game");
        games.insert(game.id.clone(), game.clone());
        Ok(game)
    }

    fn save_game(&self, game: &GameDoc) -> Result<(), GameError> {
        {
            let mut games = self
                .games
                .lock()
                .map_err(|_| GameError::Persistence("failed to lock games collection".to_string()))?;
            if !games.contains_key(&game.id) {
                return Err(GameError::NotFound(format!("game '{}'", game.id)));
            }
            games.insert(game.id.clone(), game.clone());
        }
        self.notify(game)
    }

    fn find_game_by_code(&self, code: &str) -> Result<GameDoc, GameError> {
        let games = self
            .games
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock games collection".to_string()))?;
        games
            .values()
            .find(|game| game.verification_code.eq_ignore_ascii_case(code.trim()))
            .cloned()
            .ok_or_else(|| GameError::NotFound(format!("game with verification code '{code}'")))
    }

    fn list_games(&self, status: Option<GameStatus>) -> Result<Vec<GameDoc>, GameError> {
        let games = self
            .games
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock games collection".to_string()))?;
        let mut result: Vec<GameDoc> = games
            .values()
            .filter(|game| status.is_none_or(|s| game.status == s))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    fn list_event_games(&self, event_id: &str) -> Result<Vec<GameDoc>, GameError> {
        let games = self
            .games
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock games collection".to_string()))?;
        let mut result: Vec<GameDoc> = games
            .values()
            .filter(|game| game.event_id == event_id)
            .cloned()
            .collect();
        result.sort_by_key(|game| game.game_number);
        Ok(result)
    }

    fn get_event(&self, id: &str) -> Result<EventDoc, GameError> {
        let events = self
            .events
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock events collection".to_string()))?;
        events
            .get(id)
            .cloned()
            .ok_or_else(|| GameError::NotFound(format!("event '{id}'")))
    }

    fn save_event(&self, event: &EventDoc) -> Result<(), GameError> {
        let mut events = self
            .events
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock events collection".to_string()))?;
        if !events.contains_key(&event.id) {
            return Err(GameError::NotFound(format!("event '{}'", event.id)));
        }
        events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    fn create_event_with_games(
        &self,
        mut event: EventDoc,
        mut games: Vec<GameDoc>,
    ) -> Result<(EventDoc, Vec<GameDoc>), GameError> {
        // Take both locks for the whole write so the batch lands atomically.
        let mut events = self
            .events
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock events collection".to_string()))?;
        let mut game_map = self
            .games
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock games collection".to_string()))?;

        event.id = new_id("event");
        for game in &mut games {
            game.id = new_id("game");
            game.event_id = event.id.clone();
            game_map.insert(game.id.clone(), game.clone());
        }
        events.insert(event.id.clone(), event.clone());
        Ok((event, games))
    }

    fn get_pattern(&self, id: &str) -> Result<Option<PatternDoc>, GameError> {
        let patterns = self
            .patterns
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock patterns collection".to_string()))?;
        Ok(patterns.get(id).cloned())
    }

    fn list_patterns(&self) -> Result<Vec<PatternDoc>, GameError> {
        let patterns = self
            .patterns
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock patterns collection".to_string()))?;
        let mut result: Vec<PatternDoc> = patterns.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    fn insert_pattern(&self, mut pattern: PatternDoc) -> Result<PatternDoc, GameError> {
        let mut patterns = self
            .patterns
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock patterns collection".to_string()))?;
        pattern.id = new_id("pattern");
        patterns.insert(pattern.id.clone(), pattern.clone());
        Ok(pattern)
    }

    fn subscribe_game(&self, id: &str) -> Result<watch::Receiver<GameDoc>, GameError> {
        let current = self.get_game(id)?;
        let mut watchers = self
            .watchers
            .lock()
            .map_err(|_| GameError::Persistence("failed to lock watcher registry".to_string()))?;
        let sender = watchers
            .entry(id.to_string())
            .or_insert_with(|| watch::channel(current).0);
        Ok(sender.subscribe())
    }
}
