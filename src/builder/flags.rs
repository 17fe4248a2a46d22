//! Routing of compiler/linker flag tokens into structured executor calls.
//!
//! Config tools print flags such as `-I/usr/include/SDL2 -D_REENTRANT`.
//! Tokens that map onto an executor slot go there; the rest are passed
//! through verbatim with `add_flag`.

use std::path::Path;

use crate::builder::executor::{Define, Executor};

/// Route `--cflags` style tokens: `-I<dir>`, `-I <dir>`, `-D<name>[=<value>]`.
pub fn add_cflags(executor: &mut dyn Executor, tokens: &[String]) {
    let mut tokens = tokens.iter();
    while let Some(token) = tokens.next() {
        if token == "-I" {
            match tokens.next() {
                Some(dir) => executor.add_include_path(Path::new(dir)),
                None => executor.add_flag(token),
            }
        } else if let Some(dir) = token.strip_prefix("-I") {
            executor.add_include_path(Path::new(dir));
        } else if let Some(body) = token.strip_prefix("-D").filter(|b| !b.is_empty()) {
            let define = Define::parse(body);
            executor.define_symbol(&define.name, define.value.as_deref());
        } else {
            executor.add_flag(token);
        }
    }
}

/// Route `--libs` style tokens: `-L<dir>`, `-L <dir>`, `-l<name>`.
pub fn add_libs(executor: &mut dyn Executor, tokens: &[String]) {
    let mut tokens = tokens.iter();
    while let Some(token) = tokens.next() {
        if token == "-L" {
            match tokens.next() {
                Some(dir) => executor.add_library_path(Path::new(dir)),
                None => executor.add_flag(token),
            }
        } else if let Some(dir) = token.strip_prefix("-L") {
            executor.add_library_path(Path::new(dir));
        } else if let Some(name) = token.strip_prefix("-l").filter(|n| !n.is_empty()) {
            executor.add_library(name);
        } else {
            executor.add_flag(token);
        }
    }
}
