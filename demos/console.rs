//! Headless console example.
//!
//! Registers a few variables and an `add` command, then dispatches every line
//! given on the command line, or every line read from stdin when none are.
//!
//! Run with: `cargo run --example console -- "test.integer" "add 2 3" "help"`

use std::io::BufRead;
use std::sync::LazyLock;

use bevy::prelude::*;
use bevy_console_dispatch::prelude::*;

static TEST_INTEGER: LazyLock<StaticConVar<i32>> = LazyLock::new(|| {
    StaticConVar::new("test.integer", 123)
        .description("A test integer variable")
        .on_update(|value| info!("test.integer is now {}", value))
});

static TEST_BOOL: LazyLock<StaticConVar<bool>> =
    LazyLock::new(|| StaticConVar::new("test.bool", true).description("A test boolean variable"));

static FONT_SCALE: LazyLock<StaticConVar<f32>> = LazyLock::new(|| {
    StaticConVar::new("ui.fontScale", 1.0).description("Font scaling for the window")
});

static BUILD_NAME: LazyLock<StaticConVar<&'static str>> = LazyLock::new(|| {
    StaticConVar::new("build.name", "demo")
        .description("Name of this build")
        .flags(ConVarFlags::READ_ONLY)
});

/// Lines waiting to be submitted.
#[derive(Resource, Default)]
struct PendingLines(Vec<String>);

fn main() {
    let mut lines: Vec<String> = std::env::args().skip(1).collect();
    if lines.is_empty() {
        lines = std::io::stdin().lock().lines().map_while(Result::ok).collect();
    }

    let mut app = App::new();
    app.add_plugins(ConsolePlugin::default())
        .insert_resource(PendingLines(lines))
        .add_systems(Startup, (setup, submit_lines).chain())
        .add_systems(Update, print_outputs.after(ConsoleSet::Process));
    app.update();
}

fn setup(mut console: Console) {
    console.register_static(&TEST_INTEGER);
    console.register_static(&TEST_BOOL);
    console.register_static(&FONT_SCALE);
    console.register_static(&BUILD_NAME);

    console.register_cmd(
        ConCommand::new("add", |cmd, _| {
            if cmd.argc() <= 1 {
                return Err("add method requires more than 1 argument".into());
            }
            let mut sum = 0i64;
            for token in cmd.tokens() {
                sum += token
                    .as_int()
                    .ok_or_else(|| format!("'{}' is not a number", token.text()))?;
            }
            cmd.set_return(sum.to_string());
            Ok(())
        })
        .description("Adds together a sequence of numbers"),
    );
}

fn submit_lines(mut pending: ResMut<PendingLines>, mut events: MessageWriter<ConsoleInputEvent>) {
    for line in pending.0.drain(..) {
        events.write(ConsoleInputEvent::new(line));
    }
}

fn print_outputs(mut events: MessageReader<ConsoleOutputEvent>) {
    for event in events.read() {
        match event.level {
            ConsoleOutputLevel::Command | ConsoleOutputLevel::Result => {
                println!("{}", event.message)
            }
            ConsoleOutputLevel::Error => println!("ERROR: {}", event.message),
        }
    }
}
