use clap::Parser;
use log::{error, info};
use std::error::Error;
use std::fs;

use chip8vm::config::Config;
use chip8vm::display::MonoTermDisplay;
use chip8vm::input::StdinInput;
use chip8vm::interpreter::Chip8Interpreter;
use chip8vm::sound::{Mute, SimpleBeep, Sound};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let config = Config::parse();

    // check everything we can before taking over the terminal
    let bindings = config.key_bindings()?;
    let program = fs::read(&config.rom)?;
    info!("read {} bytes from {}", program.len(), config.rom.display());

    // initialise
    let mut display = MonoTermDisplay::new()?;
    let mut input = StdinInput::new()?;
    let mut sound: Box<dyn Sound> = if config.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new(config.pitch))
    };
    let mut interpreter = Chip8Interpreter::new(&mut display, &mut input, sound.as_mut());
    interpreter.set_speed(config.speed);
    if let Some(seed) = config.seed {
        interpreter.seed(seed);
    }

    interpreter.load_rom(&program, Some(&bindings))?;
    let result = interpreter.main_loop(config.frames, config.fps);
    drop(interpreter);
    drop(input);
    drop(display);

    // report after the terminal is back to normal
    if let Err(e) = &result {
        error!("stopped: {}", e);
    }
    result?;
    Ok(())
}
