use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::challenge::domain::state_manager::StateManager;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::challenge_presenter::ChallengePresenter;
use crate::pipeline::frame_capturer::FrameCapturer;
use crate::pipeline::frame_source::FrameSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Passed,
    Failed,
    /// The source ran dry or the run was cancelled before the challenge ended.
    Interrupted,
}

/// Result of a challenge run.
///
/// `capturer` is handed back only when the challenge passed, so the caller
/// can complete remote verification with the captured frames.
pub struct ChallengeOutcome {
    pub status: ChallengeStatus,
    pub frames_processed: usize,
    pub frames_captured: usize,
    pub capturer: Option<Box<dyn FrameCapturer>>,
}

/// Challenge driver: read frame → detect → advance the state machine →
/// present → capture, until the challenge ends.
pub struct RunChallengeUseCase {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    capturer: Box<dyn FrameCapturer>,
    presenter: Box<dyn ChallengePresenter>,
    manager: StateManager,
    max_fps: Option<u32>,
    cancelled: Arc<AtomicBool>,
}

impl RunChallengeUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        capturer: Box<dyn FrameCapturer>,
        presenter: Box<dyn ChallengePresenter>,
        manager: StateManager,
    ) -> Self {
        Self {
            source,
            detector,
            capturer,
            presenter,
            manager,
            max_fps: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Caps the processing rate. A zero rate leaves the run unpaced.
    pub fn with_max_fps(mut self, max_fps: u32) -> Self {
        self.max_fps = (max_fps > 0).then_some(max_fps);
        self
    }

    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn execute(mut self) -> Result<ChallengeOutcome, Box<dyn std::error::Error>> {
        let frame_interval = self
            .max_fps
            .map(|fps| Duration::from_secs_f64(1.0 / fps as f64));
        let mut last_help_message: Option<&'static str> = None;
        let mut last_help_animation: Option<u32> = None;
        let mut frames_processed = 0;

        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                log::info!("challenge cancelled after {frames_processed} frames");
                return Ok(self.interrupted(frames_processed));
            }

            let started = Instant::now();
            let Some(frame) = self.source.next_frame()? else {
                log::info!("frame source exhausted after {frames_processed} frames");
                return Ok(self.interrupted(frames_processed));
            };

            let faces = self.detector.detect(&frame)?;
            let output = self.manager.process(&faces)?;
            frames_processed += 1;

            if let Some(draw) = &output.draw {
                self.presenter.draw(draw);
            }

            if output.help_message != last_help_message {
                log::debug!(
                    "help message change: from={last_help_message:?} to={:?}",
                    output.help_message
                );
                self.presenter.help_message_changed(output.help_message);
                last_help_message = output.help_message;
            }

            if output.help_animation != last_help_animation {
                log::debug!(
                    "help animation change: from={last_help_animation:?} to={:?}",
                    output.help_animation
                );
                self.presenter.help_animation_changed(output.help_animation);
                last_help_animation = output.help_animation;
            }

            if output.should_save_frame {
                log::debug!("should save frame {}", frame.index());
                self.capturer.capture(&frame)?;
            }

            if output.end {
                let passed = output.success == Some(true);
                if passed {
                    log::info!("challenge successfully completed locally");
                } else {
                    log::info!("challenge failed locally");
                }
                let frames_captured = self.capturer.captured();
                return Ok(ChallengeOutcome {
                    status: if passed {
                        ChallengeStatus::Passed
                    } else {
                        ChallengeStatus::Failed
                    },
                    frames_processed,
                    frames_captured,
                    capturer: passed.then_some(self.capturer),
                });
            }

            if let Some(interval) = frame_interval {
                let elapsed = started.elapsed();
                if elapsed < interval {
                    thread::sleep(interval - elapsed);
                }
            }
        }
    }

    fn interrupted(&self, frames_processed: usize) -> ChallengeOutcome {
        ChallengeOutcome {
            status: ChallengeStatus::Interrupted,
            frames_processed,
            frames_captured: self.capturer.captured(),
            capturer: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::domain::challenge_config::ChallengeConfig;
    use crate::challenge::domain::draw_instructions::DrawInstructions;
    use crate::detection::domain::detected_face::DetectedFace;
    use crate::shared::clock::testing::ManualClock;
    use crate::shared::constants::{AREA_HELP_ANIMATION, AREA_HELP_MESSAGE, NO_FACE_MESSAGE};
    use crate::shared::frame::Frame;
    use crate::shared::geometry::{Point, Rect};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // --- Stubs ---

    struct StubSource {
        remaining: usize,
        next_index: usize,
    }

    impl StubSource {
        fn new(frames: usize) -> Self {
            Self {
                remaining: frames,
                next_index: 0,
            }
        }
    }

    impl FrameSource for StubSource {
        fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
            if self.remaining == 0 {
                return Ok(None);
            }
            self.remaining -= 1;
            let frame = Frame::new(100, 100, self.next_index, 0);
            self.next_index += 1;
            Ok(Some(frame))
        }
    }

    struct StubDetector {
        batches: VecDeque<Vec<DetectedFace>>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
            Ok(self.batches.pop_front().unwrap_or_default())
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
            Err("model not loaded".into())
        }
    }

    struct RecordingCapturer {
        indices: Arc<Mutex<Vec<usize>>>,
    }

    impl FrameCapturer for RecordingCapturer {
        fn capture(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.indices.lock().unwrap().push(frame.index());
            Ok(())
        }

        fn captured(&self) -> usize {
            self.indices.lock().unwrap().len()
        }
    }

    #[derive(Debug, PartialEq)]
    enum Event {
        Draw(DrawInstructions),
        Message(Option<String>),
        Animation(Option<u32>),
    }

    struct RecordingPresenter {
        events: Arc<Mutex<Vec<Event>>>,
    }

    impl ChallengePresenter for RecordingPresenter {
        fn draw(&mut self, instructions: &DrawInstructions) {
            self.events.lock().unwrap().push(Event::Draw(*instructions));
        }

        fn help_message_changed(&mut self, message: Option<&str>) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Message(message.map(str::to_string)));
        }

        fn help_animation_changed(&mut self, animation: Option<u32>) {
            self.events.lock().unwrap().push(Event::Animation(animation));
        }
    }

    // --- Helpers ---

    const LANDMARK: usize = 30;

    fn config() -> ChallengeConfig {
        ChallengeConfig {
            face_area: Rect::new(0.0, 0.0, 100.0, 100.0),
            nose_area: Rect::new(40.0, 40.0, 20.0, 20.0),
            face_area_tolerance_percent: 10.0,
            area_duration_secs: Some(5),
            nose_duration_secs: Some(5),
            area_max_frames_without_face: 3,
            nose_max_frames_without_face: 3,
            landmark_index: LANDMARK,
        }
    }

    fn face(nose: Point) -> DetectedFace {
        let mut landmarks = vec![Point::new(0.0, 0.0); 68];
        landmarks[LANDMARK] = nose;
        DetectedFace::new(Rect::new(10.0, 10.0, 50.0, 50.0), landmarks)
    }

    fn off_target() -> DetectedFace {
        face(Point::new(20.0, 20.0))
    }

    fn on_target() -> DetectedFace {
        face(Point::new(50.0, 50.0))
    }

    struct Harness {
        captured: Arc<Mutex<Vec<usize>>>,
        events: Arc<Mutex<Vec<Event>>>,
    }

    fn use_case(
        frames: usize,
        batches: Vec<Vec<DetectedFace>>,
    ) -> (RunChallengeUseCase, Harness) {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let events = Arc::new(Mutex::new(Vec::new()));
        let manager =
            StateManager::with_clock(config(), Box::new(ManualClock::new())).unwrap();
        let use_case = RunChallengeUseCase::new(
            Box::new(StubSource::new(frames)),
            Box::new(StubDetector {
                batches: batches.into(),
            }),
            Box::new(RecordingCapturer {
                indices: captured.clone(),
            }),
            Box::new(RecordingPresenter {
                events: events.clone(),
            }),
            manager,
        );
        (use_case, Harness { captured, events })
    }

    // --- Tests ---

    #[test]
    fn test_passing_challenge_hands_back_capturer() {
        let batches = vec![
            vec![],
            vec![off_target()],
            vec![off_target()],
            vec![off_target()],
            vec![on_target()],
        ];
        let (uc, harness) = use_case(10, batches);

        let outcome = uc.execute().unwrap();

        assert_eq!(outcome.status, ChallengeStatus::Passed);
        assert_eq!(outcome.frames_processed, 5);
        assert_eq!(outcome.frames_captured, 3);
        assert_eq!(outcome.capturer.map(|c| c.captured()), Some(3));
        assert_eq!(*harness.captured.lock().unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn test_failing_challenge_withholds_capturer() {
        let batches = vec![vec![off_target()], vec![off_target(), off_target()]];
        let (uc, harness) = use_case(10, batches);

        let outcome = uc.execute().unwrap();

        assert_eq!(outcome.status, ChallengeStatus::Failed);
        assert_eq!(outcome.frames_processed, 2);
        assert!(outcome.capturer.is_none());
        assert!(harness.captured.lock().unwrap().is_empty());
    }

    #[test]
    fn test_exhausted_source_is_interrupted() {
        let (uc, _) = use_case(3, vec![]);
        let outcome = uc.execute().unwrap();
        assert_eq!(outcome.status, ChallengeStatus::Interrupted);
        assert_eq!(outcome.frames_processed, 3);
        assert!(outcome.capturer.is_none());
    }

    #[test]
    fn test_cancelled_before_first_frame() {
        let (uc, _) = use_case(3, vec![]);
        let flag = Arc::new(AtomicBool::new(true));
        let outcome = uc.with_cancel_flag(flag).execute().unwrap();
        assert_eq!(outcome.status, ChallengeStatus::Interrupted);
        assert_eq!(outcome.frames_processed, 0);
    }

    #[test]
    fn test_help_callbacks_fire_only_on_change() {
        let batches = vec![vec![], vec![], vec![off_target()], vec![], vec![]];
        let (uc, harness) = use_case(5, batches);

        uc.execute().unwrap();

        let events = harness.events.lock().unwrap();
        let help: Vec<&Event> = events
            .iter()
            .filter(|e| !matches!(e, Event::Draw(_)))
            .collect();
        assert_eq!(
            help,
            vec![
                &Event::Message(Some(NO_FACE_MESSAGE.to_string())),
                &Event::Message(None),
                &Event::Message(Some(AREA_HELP_MESSAGE.to_string())),
                &Event::Animation(Some(AREA_HELP_ANIMATION)),
            ]
        );
        let draws = events.iter().filter(|e| matches!(e, Event::Draw(_))).count();
        assert_eq!(draws, 5);
    }

    #[test]
    fn test_detector_error_propagates() {
        let manager =
            StateManager::with_clock(config(), Box::new(ManualClock::new())).unwrap();
        let uc = RunChallengeUseCase::new(
            Box::new(StubSource::new(1)),
            Box::new(FailingDetector),
            Box::new(RecordingCapturer {
                indices: Arc::new(Mutex::new(Vec::new())),
            }),
            Box::new(crate::pipeline::challenge_presenter::NullChallengePresenter),
            manager,
        );
        let err = uc.execute().err().unwrap();
        assert_eq!(err.to_string(), "model not loaded");
    }

    #[test]
    fn test_max_fps_paces_frames() {
        let (uc, _) = use_case(3, vec![]);
        let started = Instant::now();
        uc.with_max_fps(50).execute().unwrap();
        // Three unfinished frames, each padded to 20ms.
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_zero_max_fps_is_unpaced() {
        let (uc, _) = use_case(1, vec![]);
        assert!(uc.with_max_fps(0).max_fps.is_none());
    }
}
