// Notification side of the engine.
//
// Architecture:
// - channel.rs: Collaborator traits for voice/visual/parent hooks and rewards
// - gate.rs: Per-zone cooldown tracking and the quiet-hours window
// - dispatcher.rs: Best-effort dispatch of the hooks a qualifying event earns

pub mod channel;
pub mod dispatcher;
pub mod gate;
