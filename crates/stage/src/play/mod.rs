mod audio;
mod layout;
mod metrics;
mod presenter;
mod scene;
mod sequencer;
mod skip;
mod timeline;

pub use audio::{AudioBus, AudioCueKind, AudioEvent, VariantPicker};
pub use layout::{Capabilities, Device, LayoutTable, Orientation, Vec2};
pub use metrics::{MetricsHandle, PlaybackMetricsSnapshot};
pub use presenter::{LoggingPresenter, PresentError, Presenter, RecordingPresenter};
pub use scene::{PlayerInput, Scene, SceneCommand, SceneKey};
pub use sequencer::{Sequencer, SequencerConfig, SequencerError};
pub use skip::{speed_mode, PlaybackMode, SkipController};
pub use timeline::Timeline;
