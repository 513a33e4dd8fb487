// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds for the detector registry (`spec.md` §4.C).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DetectError {
    #[error("prompt is required")]
    EmptyPrompt,

    #[error("program \"{0}\" is already registered")]
    DuplicateProgramId(String),

    #[error("no detector registered for program \"{0}\"")]
    UnknownProgramId(String),
}
