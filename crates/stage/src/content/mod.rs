mod compiler;
mod types;

pub use compiler::{
    compile_presentation_defs, load_presentation_defs, ContentCompileError, ContentErrorCode,
    SourceLocation,
};
pub use types::{KrakenDef, MeterDef, PresentationDefs, SceneLayout, TimingDef};
