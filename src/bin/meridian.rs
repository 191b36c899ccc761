use std::env;
use std::process::exit;

use getopts::Options;

use meridian::web::server::AdvisorServer;

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

/// Main entry point for the Meridian advisor server
fn main() {
    simple_logger::init().expect("Failed to initialize logger");

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optopt(
        "p",
        "port",
        "Listening port for the HTTP API (default: 5380)",
        "PORT",
    );

    let opt_matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            print_usage(&program, opts);
            exit(1);
        }
    };

    if opt_matches.opt_present("h") {
        print_usage(&program, opts);
        return;
    }

    let port = match opt_matches.opt_str("p") {
        Some(value) => match value.parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                eprintln!("Invalid port: {}", value);
                exit(1);
            }
        },
        None => 5380,
    };

    log::info!("Meridian DNS advisor starting");

    AdvisorServer::new(port).run();
}
