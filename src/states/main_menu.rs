//! Main menu: New Game, Load Game, Quit.

use log::{info, warn};
use raylib::prelude::Color;

use crate::backend::Canvas;
use crate::error::Result;
use crate::events::input::InputEvent;
use crate::resources::savegame::{SavedGame, latest_save};
use crate::resources::worldtime::WorldTime;
use crate::states::{EngineContext, LoadData, State, StateCommand, StateId, StatePayload};

pub const MYSTIC_PURPLE: Color = Color::new(58, 32, 84, 255);
pub const TITLE_SIZE: i32 = 36;
pub const OPTION_SIZE: i32 = 28;

/// Rough x at which `text` drawn at `size` is centred on a `width` screen.
pub fn centered_x(text: &str, size: i32, width: i32) -> i32 {
    let approx = text.chars().count() as i32 * size / 2;
    (width - approx) / 2
}

/// Wrap `cursor + step` into `0..len`.
pub fn cycle(cursor: usize, step: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (cursor as i64 + step as i64).rem_euclid(len as i64) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    NewGame,
    LoadGame,
    Quit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 3] = [MenuOption::NewGame, MenuOption::LoadGame, MenuOption::Quit];

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::NewGame => "New Game",
            MenuOption::LoadGame => "Load Game",
            MenuOption::Quit => "Quit",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MainMenuState {
    selected: usize,
    title: String,
}

impl MainMenuState {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            selected: 0,
            title: title.into(),
        }
    }

    pub fn selected(&self) -> MenuOption {
        MenuOption::ALL[self.selected.min(MenuOption::ALL.len() - 1)]
    }

    fn load_latest(&self, ctx: &EngineContext<'_>) -> StateCommand {
        let dir = &ctx.config.saves_dir;
        let saved = match latest_save(dir) {
            Ok(path) => SavedGame::load(&path),
            Err(err) => {
                warn!("{}", err);
                None
            }
        };
        match saved {
            Some(saved) => StateCommand::LoadData(LoadData::Saved(saved)),
            None => StateCommand::change_with(
                StateId::MessageBox,
                StatePayload::Messages(vec!["No saved game could be loaded.".to_string()]),
            ),
        }
    }
}

impl State for MainMenuState {
    fn id(&self) -> StateId {
        StateId::MainMenu
    }

    fn handle_events(
        &mut self,
        ctx: &mut EngineContext<'_>,
        _events: &[InputEvent],
    ) -> Result<Option<StateCommand>> {
        self.selected = cycle(self.selected, ctx.input.menu_step(), MenuOption::ALL.len());
        if !ctx.input.confirmed() {
            return Ok(None);
        }
        let command = match self.selected() {
            MenuOption::NewGame => Some(StateCommand::change(StateId::CharacterCreation)),
            MenuOption::LoadGame => Some(self.load_latest(ctx)),
            MenuOption::Quit => {
                info!("Quit selected");
                ctx.quit_requested = true;
                None
            }
        };
        Ok(command)
    }

    fn update(&mut self, _time: &WorldTime) {}

    fn draw(&self, canvas: &mut dyn Canvas) {
        let (w, _) = canvas.size();
        canvas.clear(MYSTIC_PURPLE);
        canvas.draw_text(
            &self.title,
            centered_x(&self.title, TITLE_SIZE, w),
            100,
            TITLE_SIZE,
            Color::WHITE,
        );
        for (i, option) in MenuOption::ALL.iter().enumerate() {
            let color = if i == self.selected {
                Color::WHITE
            } else {
                Color::LIGHTGRAY
            };
            let label = option.label();
            canvas.draw_text(
                label,
                centered_x(label, OPTION_SIZE, w),
                200 + i as i32 * 50,
                OPTION_SIZE,
                color,
            );
        }
    }
}
