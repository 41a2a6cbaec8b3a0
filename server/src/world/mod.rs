pub mod anti_cheat;
pub mod movement_world;
