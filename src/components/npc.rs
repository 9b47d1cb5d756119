//! Marker components for the characters living on a map.

use bevy_ecs::prelude::Component;

/// The character driven by the keyboard.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub species: String,
    /// Base body sheet; equipment layers go on top of it.
    pub sprite: String,
}

/// A non-player character loaded from the NPC directory.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Npc {
    pub id: String,
    pub race: String,
}

impl Npc {
    /// What the player is told when talking to this NPC.
    pub fn greeting(&self) -> Vec<String> {
        vec![format!("It's {}, a {}.", display_name(&self.id), self.race)]
    }
}

fn display_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_capitalises_the_id() {
        let npc = Npc {
            id: "maren".to_string(),
            race: "human".to_string(),
        };
        assert_eq!(npc.greeting(), vec!["It's Maren, a human.".to_string()]);
    }
}
