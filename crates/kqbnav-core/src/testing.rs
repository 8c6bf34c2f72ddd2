//! Test doubles: scripted matcher, simulated game menus, fake host.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{NavError, Result};
use crate::host::{NamePattern, ProcessTable, WindowHandle, WindowSystem};
use crate::input::{Key, KeySink};
use crate::screen::{MatchResult, TemplateId, TemplateMatcher};
use crate::types::{LogicalScreen, ScreenPosition};

const CONFIDENCE_SLACK: f32 = 1e-4;
const HIT: ScreenPosition = ScreenPosition { x: 960, y: 540 };

// ========== Scripted Matcher ==========

/// Matcher with a fixed set of visible templates
#[derive(Default)]
pub(crate) struct ScriptedMatcher {
    visible: HashMap<TemplateId, f32>,
    failing: Option<TemplateId>,
    pub calls: Vec<(TemplateId, f32)>,
}

impl ScriptedMatcher {
    /// `template` matches at any confidence up to `max_confidence`
    pub fn visible(mut self, template: TemplateId, max_confidence: f32) -> Self {
        self.visible.insert(template, max_confidence);
        self
    }

    /// Looking up `template` is a capture fault
    pub fn failing(mut self, template: TemplateId) -> Self {
        self.failing = Some(template);
        self
    }
}

impl TemplateMatcher for ScriptedMatcher {
    fn locate(&mut self, template: TemplateId, confidence: f32) -> Result<MatchResult> {
        self.calls.push((template, confidence));
        if self.failing == Some(template) {
            return Err(NavError::Capture("scripted failure".to_string()));
        }
        Ok(match self.visible.get(&template) {
            Some(&max) if confidence <= max + CONFIDENCE_SLACK => MatchResult::Found(HIT),
            _ => MatchResult::NotFound,
        })
    }
}

// ========== Simulated Game ==========

pub(crate) struct GameState {
    pub screen: LogicalScreen,
    /// Menu cursor rests on the item that leads deeper
    pub item_focused: bool,
    /// When false, "up" never lands focus on the item
    pub focus_lands: bool,
    /// Best confidence at which the rendered templates match
    pub render_confidence: f32,
    /// Nothing recognisable on screen
    pub blank: bool,
    /// Confirm is swallowed (unresponsive client)
    pub stuck: bool,
    pub keys: Vec<Key>,
    pub typed: String,
    pub locates: usize,
}

/// Menu simulation shared between a matcher and a key sink
#[derive(Clone)]
pub(crate) struct FakeGame(Rc<RefCell<GameState>>);

impl FakeGame {
    pub fn new(screen: LogicalScreen) -> Self {
        Self(Rc::new(RefCell::new(GameState {
            screen,
            item_focused: true,
            focus_lands: true,
            render_confidence: 0.9,
            blank: false,
            stuck: false,
            keys: Vec::new(),
            typed: String::new(),
            locates: 0,
        })))
    }

    pub fn matcher(&self) -> GameMatcher {
        GameMatcher(self.clone())
    }

    pub fn keyboard(&self) -> GameKeys {
        GameKeys(self.clone())
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    pub fn screen(&self) -> LogicalScreen {
        self.0.borrow().screen
    }

    pub fn keys(&self) -> Vec<Key> {
        self.0.borrow().keys.clone()
    }

    pub fn typed(&self) -> String {
        self.0.borrow().typed.clone()
    }

    pub fn count(&self, key: Key) -> usize {
        self.0.borrow().keys.iter().filter(|k| **k == key).count()
    }
}

fn rendered(state: &GameState) -> Vec<TemplateId> {
    if state.blank {
        return Vec::new();
    }
    let focused = state.item_focused;
    match state.screen {
        LogicalScreen::Unknown => vec![],
        LogicalScreen::PressButton => vec![TemplateId::PushButtonToStart],
        LogicalScreen::MainMenu if focused => vec![TemplateId::OnlineFocused],
        LogicalScreen::MainMenu => vec![TemplateId::OnlineNotFocused],
        LogicalScreen::OnlineMenu if focused => vec![TemplateId::CustomFocused],
        LogicalScreen::OnlineMenu => vec![TemplateId::CustomNotFocused],
        LogicalScreen::CustomMenu if focused => vec![TemplateId::SpectateFocused],
        LogicalScreen::CustomMenu => vec![TemplateId::SpectateNotFocused],
        LogicalScreen::CodeEntry => vec![TemplateId::EnterKey],
        LogicalScreen::Connecting => vec![TemplateId::ConnectingToCustom],
    }
}

pub(crate) struct GameMatcher(FakeGame);

impl TemplateMatcher for GameMatcher {
    fn locate(&mut self, template: TemplateId, confidence: f32) -> Result<MatchResult> {
        self.0.with(|state| {
            state.locates += 1;
            let hit = confidence <= state.render_confidence + CONFIDENCE_SLACK
                && rendered(state).contains(&template);
            Ok(if hit {
                MatchResult::Found(HIT)
            } else {
                MatchResult::NotFound
            })
        })
    }
}

pub(crate) struct GameKeys(FakeGame);

impl KeySink for GameKeys {
    fn key(&mut self, key: Key) -> Result<()> {
        self.0.with(|state| {
            state.keys.push(key);
            match key {
                Key::Left | Key::Down => state.item_focused = false,
                Key::Up => state.item_focused = state.focus_lands,
                Key::Enter if !state.stuck => {
                    let next = match state.screen {
                        LogicalScreen::PressButton => Some(LogicalScreen::MainMenu),
                        LogicalScreen::MainMenu if state.item_focused => Some(LogicalScreen::OnlineMenu),
                        LogicalScreen::OnlineMenu if state.item_focused => Some(LogicalScreen::CustomMenu),
                        LogicalScreen::CustomMenu if state.item_focused => Some(LogicalScreen::CodeEntry),
                        LogicalScreen::CodeEntry => Some(LogicalScreen::Connecting),
                        _ => None,
                    };
                    if let Some(next) = next {
                        state.screen = next;
                        state.item_focused = false;
                    }
                }
                Key::Esc => {
                    let prev = match state.screen {
                        LogicalScreen::OnlineMenu => Some(LogicalScreen::MainMenu),
                        LogicalScreen::CustomMenu => Some(LogicalScreen::OnlineMenu),
                        LogicalScreen::CodeEntry | LogicalScreen::Connecting => {
                            Some(LogicalScreen::CustomMenu)
                        }
                        _ => None,
                    };
                    if let Some(prev) = prev {
                        state.screen = prev;
                        state.item_focused = false;
                        state.typed.clear();
                    }
                }
                Key::Backspace if state.screen == LogicalScreen::CodeEntry => {
                    state.typed.pop();
                }
                Key::Char(c) if state.screen == LogicalScreen::CodeEntry => state.typed.push(c),
                _ => {}
            }
            Ok(())
        })
    }
}

// ========== Fake Host ==========

pub(crate) struct HostState {
    pub running: bool,
    /// Process appears after this many `is_running` checks; `None` = never
    pub starts_after: Option<u32>,
    pub checks: u32,
    /// Closing a game window stops the process
    pub close_stops: bool,
    pub windows: Vec<(WindowHandle, String)>,
    pub foreground: Option<WindowHandle>,
    pub closed: Vec<WindowHandle>,
}

#[derive(Clone)]
pub(crate) struct FakeHost(Rc<RefCell<HostState>>);

impl FakeHost {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(HostState {
            running: false,
            starts_after: None,
            checks: 0,
            close_stops: true,
            windows: Vec::new(),
            foreground: None,
            closed: Vec::new(),
        })))
    }

    /// Host with the game already running in a window
    pub fn running_game() -> Self {
        let host = Self::new();
        host.with(|s| s.running = true);
        host.add_window(7, "Killer Queen Black");
        host
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut HostState) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    pub fn add_window(&self, id: isize, title: &str) {
        self.with(|s| s.windows.push((WindowHandle(id), title.to_string())));
    }

    pub fn set_foreground(&self, handle: Option<WindowHandle>) {
        self.with(|s| s.foreground = handle);
    }

    pub fn foreground(&self) -> Option<WindowHandle> {
        self.0.borrow().foreground
    }

    pub fn processes(&self) -> FakeProcesses {
        FakeProcesses(self.clone())
    }

    pub fn windows(&self) -> FakeWindows {
        FakeWindows(self.clone())
    }
}

pub(crate) struct FakeProcesses(FakeHost);

impl ProcessTable for FakeProcesses {
    fn is_running(&mut self, _pattern: &NamePattern) -> bool {
        self.0.with(|s| {
            s.checks += 1;
            if !s.running {
                if let Some(n) = s.starts_after {
                    if s.checks >= n {
                        s.running = true;
                    }
                }
            }
            s.running
        })
    }
}

pub(crate) struct FakeWindows(FakeHost);

impl WindowSystem for FakeWindows {
    fn windows(&self) -> Result<Vec<WindowHandle>> {
        Ok(self.0.with(|s| s.windows.iter().map(|(h, _)| *h).collect()))
    }

    fn title(&self, handle: WindowHandle) -> String {
        self.0.with(|s| {
            s.windows
                .iter()
                .find(|(h, _)| *h == handle)
                .map(|(_, t)| t.clone())
                .unwrap_or_default()
        })
    }

    fn foreground(&self) -> Option<WindowHandle> {
        self.0.foreground()
    }

    fn set_foreground(&mut self, handle: WindowHandle) -> Result<()> {
        self.0.set_foreground(Some(handle));
        Ok(())
    }

    fn close(&mut self, handle: WindowHandle) -> Result<()> {
        self.0.with(|s| {
            s.windows.retain(|(h, _)| *h != handle);
            s.closed.push(handle);
            if s.foreground == Some(handle) {
                s.foreground = None;
            }
            if s.close_stops {
                s.running = false;
                s.checks = 0;
            }
        });
        Ok(())
    }
}
