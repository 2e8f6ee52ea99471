//! Compile configuration shared across the downlevel crates.
//!
//! These enums mirror the values accepted on the command line of the
//! surrounding driver. The transform engine reads them once during pipeline
//! selection; individual passes read them through the transformation context.

use serde::{Deserialize, Serialize};

/// ECMAScript language version targeted by emission.
///
/// Ordering is meaningful: `target < ScriptTarget::ES2015` decides whether the
/// ES2015 downleveling pass joins the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ScriptTarget {
    ES3 = 0,
    ES5 = 1,
    ES2015 = 2,
    ES2016 = 3,
    ES2017 = 4,
    ES2018 = 5,
    ES2019 = 6,
    ES2020 = 7,
    ESNext = 99,
}

/// Module output format for emitted files.
///
/// `Node16` and `NodeNext` are resolution-oriented kinds accepted by
/// configuration parsing; they have no entry in the module transformer table
/// and are rejected during pipeline selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ModuleKind {
    None = 0,
    CommonJS = 1,
    AMD = 2,
    UMD = 3,
    System = 4,
    ES2015 = 5,
    ESNext = 6,
    Node16 = 7,
    NodeNext = 8,
}

/// How JSX constructs are handled during transformation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum JsxEmit {
    None = 0,
    Preserve = 1,
    React = 2,
}

/// Newline style used by the emit host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NewLineKind {
    CarriageReturnLineFeed = 0,
    LineFeed = 1,
}

impl NewLineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NewLineKind::CarriageReturnLineFeed => "\r\n",
            NewLineKind::LineFeed => "\n",
        }
    }
}

/// The slice of compiler configuration the transform engine consumes.
///
/// Read once by pipeline selection; fixed for the duration of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerOptions {
    pub target: ScriptTarget,
    pub module: ModuleKind,
    pub jsx: JsxEmit,
    pub new_line: NewLineKind,
}

impl Default for CompilerOptions {
    fn default() -> CompilerOptions {
        CompilerOptions {
            target: ScriptTarget::ES2015,
            module: ModuleKind::ES2015,
            jsx: JsxEmit::None,
            new_line: NewLineKind::LineFeed,
        }
    }
}
