// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use bunny_dof::config::DemoConfig;
use bunny_dof::scene::run_single_bunny;
use js_hooks::console_error;

fn main() {
    // Required to get stack traces in WASM.
    #[cfg(target_family = "wasm")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    if let Err(e) = run_single_bunny(DemoConfig::single_bunny()) {
        console_error!("bunny: {}", e);
    }
}
