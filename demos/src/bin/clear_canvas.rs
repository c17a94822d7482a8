// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use bunny_dof::clear;
use bunny_dof::config::ClearConfig;
use js_hooks::console_error;

fn main() {
    // Required to get stack traces in WASM.
    #[cfg(target_family = "wasm")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    if let Err(e) = clear::run(&ClearConfig::default()) {
        console_error!("clear canvas: {}", e);
    }
}
