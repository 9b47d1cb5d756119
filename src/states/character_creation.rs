//! Character creation.
//!
//! Up/down picks a row, left/right cycles its choice. Confirming "Start
//! Game" hands a fresh [`PlayerData`] to the gameplay state; "Back" returns
//! to the main menu.

use log::info;
use raylib::prelude::Color;

use crate::backend::Canvas;
use crate::components::character::Facing;
use crate::components::inventory::Inventory;
use crate::components::item::Item;
use crate::components::mapposition::MapPosition;
use crate::error::Result;
use crate::events::input::InputEvent;
use crate::resources::savegame::PlayerData;
use crate::resources::worldtime::WorldTime;
use crate::states::main_menu::{OPTION_SIZE, TITLE_SIZE, centered_x, cycle};
use crate::states::{EngineContext, LoadData, State, StateCommand, StateId};

pub const MYSTIC_RED: Color = Color::new(96, 24, 40, 255);

const NAMES: [&str; 3] = ["Dylan", "Cody", "Bob"];
const WOODS: [&str; 3] = ["Oak", "Pine", "Larch"];
const CORES: [&str; 3] = ["Dragon Heartstring", "Phoenix Feather", "Unicorn Hair"];
const LENGTHS: [u32; 3] = [9, 11, 13];

const SPECIES: &str = "human";
const CLOAK_STYLE: &str = "school_cloak";
const START_POSITION: MapPosition = MapPosition { x: 32, y: 32 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Name,
    Wood,
    Core,
    Length,
    Start,
    Back,
}

const ROWS: [Row; 6] = [Row::Name, Row::Wood, Row::Core, Row::Length, Row::Start, Row::Back];

#[derive(Debug, Clone, Default)]
pub struct CharacterCreationState {
    row: usize,
    name: usize,
    wood: usize,
    core: usize,
    length: usize,
}

impl CharacterCreationState {
    pub fn new() -> Self {
        Self::default()
    }

    fn choice_len(row: Row) -> usize {
        match row {
            Row::Name => NAMES.len(),
            Row::Wood => WOODS.len(),
            Row::Core => CORES.len(),
            Row::Length => LENGTHS.len(),
            Row::Start | Row::Back => 1,
        }
    }

    fn choice_mut(&mut self, row: Row) -> Option<&mut usize> {
        match row {
            Row::Name => Some(&mut self.name),
            Row::Wood => Some(&mut self.wood),
            Row::Core => Some(&mut self.core),
            Row::Length => Some(&mut self.length),
            Row::Start | Row::Back => None,
        }
    }

    fn label(&self, row: Row) -> String {
        match row {
            Row::Name => format!("Name: {}", NAMES[self.name]),
            Row::Wood => format!("Wand Wood: {}", WOODS[self.wood]),
            Row::Core => format!("Wand Core: {}", CORES[self.core]),
            Row::Length => format!("Wand Length (inches): {}", LENGTHS[self.length]),
            Row::Start => "Start Game".to_string(),
            Row::Back => "Back".to_string(),
        }
    }

    /// Step the focused row (`dy`) or its choice (`dx`).
    pub fn navigate(&mut self, dy: i32, dx: i32) {
        self.row = cycle(self.row, dy, ROWS.len());
        let row = ROWS[self.row];
        let len = Self::choice_len(row);
        if let Some(choice) = self.choice_mut(row) {
            *choice = cycle(*choice, dx, len);
        }
    }

    /// The character as currently chosen: cloak worn, wand in the bag.
    pub fn make_player(&self) -> PlayerData {
        let mut inventory = Inventory::new();
        // a fresh inventory has a free cloak slot
        let _ = inventory.equip(Item::cloak(SPECIES, CLOAK_STYLE));
        inventory.add_item(Item::wand(
            WOODS[self.wood],
            CORES[self.core],
            LENGTHS[self.length],
        ));
        PlayerData {
            name: NAMES[self.name].to_string(),
            species: SPECIES.to_string(),
            sprite: format!("{SPECIES}/base"),
            position: START_POSITION,
            facing: Facing::Down,
            inventory: inventory.save(),
        }
    }
}

impl State for CharacterCreationState {
    fn id(&self) -> StateId {
        StateId::CharacterCreation
    }

    fn handle_events(
        &mut self,
        ctx: &mut EngineContext<'_>,
        _events: &[InputEvent],
    ) -> Result<Option<StateCommand>> {
        self.navigate(ctx.input.menu_step(), ctx.input.choice_step());
        if !ctx.input.action_accept.just_pressed {
            return Ok(None);
        }
        match ROWS[self.row] {
            Row::Start => {
                let player = self.make_player();
                info!("Starting a new game as {}", player.name);
                Ok(Some(StateCommand::LoadData(LoadData::NewGame(player))))
            }
            Row::Back => Ok(Some(StateCommand::change(StateId::MainMenu))),
            _ => Ok(None),
        }
    }

    fn update(&mut self, _time: &WorldTime) {}

    fn draw(&self, canvas: &mut dyn Canvas) {
        let (w, _) = canvas.size();
        canvas.clear(MYSTIC_RED);
        let title = "Character Creation";
        canvas.draw_text(title, centered_x(title, TITLE_SIZE, w), 100, TITLE_SIZE, Color::WHITE);
        for (i, row) in ROWS.iter().enumerate() {
            let color = if i == self.row {
                Color::WHITE
            } else {
                Color::LIGHTGRAY
            };
            let label = self.label(*row);
            canvas.draw_text(
                &label,
                centered_x(&label, OPTION_SIZE, w),
                200 + i as i32 * 50,
                OPTION_SIZE,
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::item::Slot;

    #[test]
    fn choices_cycle_per_row() {
        let mut state = CharacterCreationState::new();
        state.navigate(0, -1);
        assert_eq!(state.label(Row::Name), "Name: Bob");
        state.navigate(1, 1);
        state.navigate(0, 1);
        assert_eq!(state.label(Row::Wood), "Wand Wood: Larch");
        state.navigate(-2, 0);
        assert_eq!(ROWS[state.row], Row::Back);
    }

    #[test]
    fn new_player_wears_cloak_and_carries_wand() {
        let mut state = CharacterCreationState::new();
        state.navigate(3, 2);
        let player = state.make_player();
        assert_eq!(player.name, "Dylan");
        assert_eq!(player.position, MapPosition::new(32, 32));
        let inventory = Inventory::load(&player.inventory);
        assert_eq!(
            inventory.equipped(Slot::Cloak),
            Some(&Item::cloak("human", "school_cloak"))
        );
        assert_eq!(inventory.bag(), &[Item::wand("Oak", "Dragon Heartstring", 13)]);
    }
}
