use crate::ui::UiEvent;
use std::collections::VecDeque;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One recorded user interaction, replayed against the editor.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer press at pixel coordinates (top-left origin).
    PointerDown { x: f32, y: f32 },
    /// Press that hit no geometry at all.
    PointerMiss,
    Ui { event: UiEvent },
    WaitFrames { frames: u32 },
    /// Hold until no furniture load is in flight.
    WaitLoads,
}

/// Queue of interactions released frame by frame.
#[derive(Debug, Default)]
pub struct Session {
    events: VecDeque<InputEvent>,
    wait_frames: u32,
}

impl Session {
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self {
            events: events.into(),
            wait_frames: 0,
        }
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path)?;
        let events: Vec<InputEvent> = serde_json::from_str(&json)?;
        Ok(Self::new(events))
    }

    pub fn is_finished(&self) -> bool {
        self.events.is_empty() && self.wait_frames == 0
    }

    /// Events due this frame. Stops at the first wait.
    pub fn poll(&mut self, loads_pending: bool) -> Vec<InputEvent> {
        if self.wait_frames > 0 {
            self.wait_frames -= 1;
            return Vec::new();
        }
        let mut due = Vec::new();
        while let Some(event) = self.events.front() {
            match event {
                InputEvent::WaitFrames { frames } => {
                    self.wait_frames = frames.saturating_sub(1);
                    self.events.pop_front();
                    break;
                }
                InputEvent::WaitLoads => {
                    if loads_pending {
                        break;
                    }
                    self.events.pop_front();
                }
                _ => {
                    if let Some(event) = self.events.pop_front() {
                        due.push(event);
                    }
                }
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_split_events_across_frames() {
        let mut session = Session::new(vec![
            InputEvent::PointerMiss,
            InputEvent::WaitFrames { frames: 2 },
            InputEvent::Ui {
                event: UiEvent::Extend,
            },
        ]);
        assert_eq!(session.poll(false), vec![InputEvent::PointerMiss]);
        assert!(session.poll(false).is_empty());
        assert_eq!(
            session.poll(false),
            vec![InputEvent::Ui {
                event: UiEvent::Extend
            }]
        );
        assert!(session.is_finished());
    }

    #[test]
    fn wait_loads_blocks_while_pending() {
        let mut session = Session::new(vec![
            InputEvent::WaitLoads,
            InputEvent::PointerDown { x: 640.0, y: 360.0 },
        ]);
        assert!(session.poll(true).is_empty());
        assert!(session.poll(true).is_empty());
        assert_eq!(
            session.poll(false),
            vec![InputEvent::PointerDown { x: 640.0, y: 360.0 }]
        );
    }

    #[test]
    fn session_parses_from_json() {
        let events: Vec<InputEvent> = serde_json::from_str(
            r#"[
                {"type": "wait_loads"},
                {"type": "pointer_down", "x": 640, "y": 360},
                {"type": "ui", "event": {"type": "axis_changed", "axis": "x", "value": 2.0}},
                {"type": "wait_frames", "frames": 3},
                {"type": "pointer_miss"}
            ]"#,
        )
        .unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[1], InputEvent::PointerDown { x: 640.0, y: 360.0 });
    }
}
