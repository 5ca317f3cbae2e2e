/// Things that happened during one simulated frame. The audio and log
/// collaborators consume these; the simulation never reads them back.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifeLostCause {
    TimerExpired,
    Defeated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted,
    PauseToggled { paused: bool },
    Jumped,
    Landed,
    AttackStarted,
    HostileHit { hostile: usize, remaining_health: u32 },
    HostileDefeated { hostile: usize },
    PlayerHit { remaining_health: u32 },
    Delivered { structure: usize, objectives_remaining: bool },
    DeliveryFinished,
    LevelComplete { level: u32 },
    LevelLoaded { level: u32, loop_count: u32 },
    LifeLost { cause: LifeLostCause, lives_left: u32 },
    GameOver { score: u32 },
    ReturnedToMenu,
}
