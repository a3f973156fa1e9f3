//! fieldscan entry point.
//!
//! Scans barcodes from a camera (or typed on stdin) and prints each value
//! with a timestamp.

mod config;
mod manual_input;
mod preview;

use chrono::Local;
use config::{AppConfig, Options, USAGE};
use logging::Logger;
use manual_input::{ManualEntry, ManualInput};
use media::{OpenCvBarcodeDecoder, OpenCvCamera};
use preview::PreviewWindow;
use scanner::{
    DetectionHandler, HeadlessSurface, RenderSurface, ScanLoopController, StartOutcome,
    TickOutcome,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const PREVIEW_WINDOW: &str = "fieldscan";

fn main() {
    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    if options.help {
        println!("{}", USAGE);
        return;
    }

    let config = load_config(&options);
    let logger = initialize_logger(&config);

    for key in &config.unknown_keys {
        logger.warn(&format!("Unknown configuration key '{}' ignored", key));
    }

    let camera = OpenCvCamera::new(logger.for_component("Camera"));

    if options.list {
        list_devices(&camera);
        return;
    }

    let decoder = match OpenCvBarcodeDecoder::new(logger.for_component("Decoder")) {
        Ok(decoder) => decoder,
        Err(e) => {
            logger.error(&format!("Failed to create barcode decoder: {}", e));
            eprintln!("Failed to create barcode decoder: {}", e);
            std::process::exit(1);
        }
    };

    let controller =
        match ScanLoopController::new(camera, Box::new(decoder), config.scan.clone(), &logger) {
            Ok(controller) => controller,
            Err(e) => {
                eprintln!("Invalid scan settings: {}", e);
                std::process::exit(1);
            }
        };

    logger.info("fieldscan starting...");
    let host = ScanHost::new(controller, &config, options.once, logger.clone());
    host.run(ManualEntry::spawn_stdin(logger.for_component("Input")));
    logger.info("fieldscan stopped");
}

/// Loads configuration from `--config`, the usual locations, or defaults
fn load_config(options: &Options) -> AppConfig {
    let loaded = match &options.config_path {
        Some(path) => AppConfig::load_from_file(path).map(|config| (config, Some(path.clone()))),
        None => AppConfig::load(),
    };

    match loaded {
        Ok((config, Some(path))) => {
            println!("Configuration loaded from: {}", path.display());
            config
        }
        Ok((config, None)) => {
            println!("No configuration file found, using defaults");
            config
        }
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Initializes the main logger from configuration
fn initialize_logger(config: &AppConfig) -> Logger {
    match Logger::with_component(
        config.log_path.clone(),
        config.log_level,
        Some("Main"),
        config.log_console,
    ) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to create logger: {}", e);
            eprintln!("Cannot continue without logging system.");
            std::process::exit(1);
        }
    }
}

/// Prints every device with the resolution it opens at
fn list_devices(camera: &OpenCvCamera) {
    let devices = camera.describe_devices();
    if devices.is_empty() {
        println!("No capture devices found");
        return;
    }
    for device in devices {
        println!(
            "[{}] {} ({}, facing: {})",
            device.device_id,
            device.name,
            device.resolution_string(),
            device.facing
        );
    }
}

/// Prints each detection with a local timestamp
fn detection_printer() -> DetectionHandler {
    Box::new(|text: &str| {
        println!("{}  {}", Local::now().format("%Y-%m-%d %H:%M:%S"), text);
    })
}

enum Next {
    Continue,
    Quit,
}

/// Interactive scan loop around one controller
struct ScanHost<'a> {
    controller: ScanLoopController<OpenCvCamera>,
    config: &'a AppConfig,
    once: bool,
    camera_ready: bool,
    quit: Arc<AtomicBool>,
    logger: Logger,
}

impl<'a> ScanHost<'a> {
    fn new(
        mut controller: ScanLoopController<OpenCvCamera>,
        config: &'a AppConfig,
        once: bool,
        logger: Logger,
    ) -> Self {
        // Typed codes are printed even if the camera never starts
        controller.set_detection_handler(detection_printer());
        Self {
            controller,
            config,
            once,
            camera_ready: false,
            quit: Arc::new(AtomicBool::new(false)),
            logger,
        }
    }

    fn run(mut self, manual: ManualEntry) {
        // The access check opens the device; start waits out the settle
        // delay before opening it again
        self.camera_ready = self.check_camera();
        if self.camera_ready {
            self.start_camera();
        } else {
            self.logger.warn("No usable camera; manual entry only");
            println!("No camera available. Type a code and press Enter.");
        }

        while !self.quit.load(Ordering::SeqCst) {
            if self.controller.is_running() {
                if let ManualInput::Line(line) = manual.poll() {
                    if let Next::Quit = self.handle_line(&line) {
                        break;
                    }
                    continue;
                }
                if let Some(TickOutcome::Detected(_)) = self.controller.poll() {
                    if let Next::Quit = self.after_detection() {
                        break;
                    }
                }
                continue;
            }

            // Camera idle: block until the user types something
            match manual.wait() {
                ManualInput::Line(line) => {
                    if let Next::Quit = self.handle_line(&line) {
                        break;
                    }
                }
                ManualInput::Empty | ManualInput::Closed => break,
            }
        }

        self.controller.stop();
        let stats = self.controller.stats();
        self.logger.info(&format!(
            "Scanned {} codes ({} typed) over {} samples",
            stats.detections + stats.manual_entries,
            stats.manual_entries,
            stats.samples
        ));
    }

    fn check_camera(&mut self) -> bool {
        if !self.controller.is_camera_available() {
            return false;
        }
        match self.controller.probe_access() {
            Ok(()) => true,
            Err(e) => {
                eprintln!("{}", e);
                false
            }
        }
    }

    fn surface(&self) -> Box<dyn RenderSurface> {
        if self.config.preview {
            Box::new(PreviewWindow::new(
                PREVIEW_WINDOW,
                self.controller.stop_handle(),
                Arc::clone(&self.quit),
                self.logger.for_component("Preview"),
            ))
        } else {
            Box::new(HeadlessSurface::new())
        }
    }

    fn start_camera(&mut self) {
        let surface = self.surface();
        let result = if self.controller.stats().starts == 0 {
            self.controller.start(surface, detection_printer())
        } else {
            self.controller.restart(surface, detection_printer())
        };

        match result {
            Ok(StartOutcome::Started) => {
                println!("Scanning... (type a code and press Enter to skip the camera)")
            }
            Ok(StartOutcome::AlreadyRunning) => {}
            Err(e) => {
                eprintln!("Camera failed to start: {}", e);
                self.logger.warn("Falling back to manual entry");
                self.camera_ready = false;
            }
        }
    }

    fn handle_line(&mut self, line: &str) -> Next {
        if !self.controller.submit_manual(line) {
            // Blank line: scan again
            if self.camera_ready && !self.controller.is_running() {
                self.start_camera();
            }
            return Next::Continue;
        }
        self.after_detection()
    }

    fn after_detection(&mut self) -> Next {
        if self.once {
            return Next::Quit;
        }
        if self.camera_ready {
            if self.config.continuous {
                self.start_camera();
            } else {
                println!("Press Enter to scan again, or type a code.");
            }
        }
        Next::Continue
    }
}
