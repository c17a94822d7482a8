// SPDX-FileCopyrightText: 2021 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use bunny_dof::config::DemoConfig;
use bunny_dof::scene::run_bunny_grid;
use js_hooks::console_error;

fn main() {
    // Required to get stack traces in WASM.
    #[cfg(target_family = "wasm")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    // Grid size, spacing and spin can be tweaked here.
    let config = DemoConfig::bunny_grid();
    js_hooks::console_log!(
        "rendering {} bunnies with depth of field",
        config.grid.size * config.grid.size
    );

    if let Err(e) = run_bunny_grid(config) {
        console_error!("bunnies: {}", e);
    }
}
