use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    manim_bridge::init();

    manim_bridge::cli::run()
}
