// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::{io::Write, time::Duration};

pub use self::reexport::*;
pub use self::styled::Styled;

mod styled;

/// Wraps a [`Write`] and advances the provided [`ProgressBar`] by the
/// number of bytes written
pub struct ProgressWriter<W> {
    pub writer: W,
    pub progress: ProgressBar,
}

impl<W> ProgressWriter<W> {
    pub fn new(writer: W, progress: ProgressBar) -> Self {
        Self { writer, progress }
    }
}

impl<W: Write> Write for ProgressWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let bytes = self.writer.write(buf)?;
        self.progress.inc(bytes as u64);
        Ok(bytes)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

/// Progress bar for a transfer of `total` bytes, or a spinner when the
/// size isn't known up front
pub fn transfer_bar(total: Option<u64>, message: String) -> ProgressBar {
    let (pb, template) = match total {
        Some(total) => (
            ProgressBar::new(total),
            " {spinner} {wide_msg} {binary_bytes}/{binary_total_bytes} {binary_bytes_per_sec:>.dim} ",
        ),
        None => (
            ProgressBar::new_spinner(),
            " {spinner} {wide_msg} {binary_bytes} {binary_bytes_per_sec:>.dim} ",
        ),
    };

    let style = ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("--=≡■≡=--");

    let pb = pb.with_style(style).with_message(message);
    pb.enable_steady_tick(Duration::from_millis(150));
    pb
}

mod reexport {
    pub use crossterm::style::Stylize;
    pub use indicatif::{ProgressBar, ProgressStyle};
}
