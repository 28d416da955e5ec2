/// Plot setup compiler: CLI strings → [`PlotSetup`].
///
/// ```text
///  "C-1E_ch/C-1E-CTR_ch"   "TOT_PREC12,CLCT"   "FBI,MF/OF"   "0.1,1:2.5"
///            │                    │                  │             │
///            ▼                    ▼                  ▼             ▼
///   ┌──────────────────────────────────────────────────────────────────┐
///   │ compiler   validate model dirs, expand score/threshold groups    │
///   └──────────────────────────────────────────────────────────────────┘
///            │
///            ▼
///      PlotSetup { model_version_groups, parameters, model_colors }
/// ```

pub mod compiler;
pub mod model;

pub use compiler::compile;
pub use model::{ParameterScores, PlotSetup, ScoreGroup, SetupRequest};
