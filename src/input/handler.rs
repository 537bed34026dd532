use crate::{
    core::{config::InteractionOptions, geo::Point},
    input::events::{InputEvent, MapEvent},
    prelude::HashMap,
};
use std::collections::VecDeque;

/// What the map should do in response to an input event
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Anchor a drag at the pointer position
    BeginDrag { position: Point },
    /// Move the viewport origin along with the pointer
    UpdateDrag { position: Point },
    /// Release the drag anchor
    EndDrag,
    /// Place the highlighted marker under the given screen point
    PlaceMarker { position: Point },
    /// Zoom around a screen point by a wheel delta
    Zoom { delta_y: f64, focus: Point },
    /// Resize the rendering surface
    Resize { size: Point },
}

/// Pointer state of the interaction state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging,
}

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Event management system for the map
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Dispatch all queued events to their listeners and return them
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }
}

/// Turns raw input events into map actions.
///
/// `Idle --PointerDown--> Dragging --PointerMove--> Dragging --PointerUp--> Idle`.
/// Clicks only act while idle; wheel and resize act in any state.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    options: InteractionOptions,
}

impl InteractionController {
    pub fn new(options: InteractionOptions) -> Self {
        Self {
            state: InteractionState::Idle,
            options,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn options(&self) -> &InteractionOptions {
        &self.options
    }

    /// Advance the state machine and return the action to execute, if any
    pub fn handle_event(&mut self, event: InputEvent) -> Option<Action> {
        match (self.state, event) {
            (InteractionState::Idle, InputEvent::PointerDown { position }) => {
                if !self.options.dragging {
                    return None;
                }
                log::debug!("drag start at ({:.1}, {:.1})", position.x, position.y);
                self.state = InteractionState::Dragging;
                Some(Action::BeginDrag { position })
            }
            (InteractionState::Dragging, InputEvent::PointerMove { position }) => {
                Some(Action::UpdateDrag { position })
            }
            (InteractionState::Dragging, InputEvent::PointerUp) => {
                log::debug!("drag end");
                self.state = InteractionState::Idle;
                Some(Action::EndDrag)
            }
            (InteractionState::Idle, InputEvent::Click { position }) => self
                .options
                .place_on_click
                .then_some(Action::PlaceMarker { position }),
            (InteractionState::Dragging, InputEvent::Click { .. }) => {
                log::debug!("click ignored while dragging");
                None
            }
            (_, InputEvent::Wheel { delta_y, position }) => self
                .options
                .scroll_wheel_zoom
                .then_some(Action::Zoom {
                    delta_y,
                    focus: position,
                }),
            (_, InputEvent::Resize { size }) => Some(Action::Resize { size }),
            // Moves and releases with no drag in progress, or a second press
            // while already dragging
            _ => None,
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(InteractionOptions::default())
    }
}
