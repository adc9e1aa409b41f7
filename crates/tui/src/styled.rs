// SPDX-FileCopyrightText: Copyright © 2025 tarbump Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::io::stdout;

use crossterm::{style::Stylize, tty::IsTty};

macro_rules! impl_method {
    ($method:ident) => {
        fn $method(self) -> <Self as Stylize>::Styled {
            if stdout().is_tty() {
                <Self as Stylize>::$method(self)
            } else {
                self.stylize()
            }
        }
    };
}

/// Colours for status lines, plain text when stdout isn't a terminal
pub trait Styled: Stylize {
    impl_method!(bold);
    impl_method!(red);
    impl_method!(green);
    impl_method!(blue);
}

impl<T> Styled for T where T: Stylize {}
