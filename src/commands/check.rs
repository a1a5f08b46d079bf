use crate::config::{Config, OPTIONAL_VARS, REQUIRED_VARS};

pub fn run() {
    println!("🔎 stockpulse configuration check\n");

    let mut missing = 0;
    for name in REQUIRED_VARS {
        if std::env::var(name).is_ok() {
            println!("✅ {}", name);
        } else {
            println!("❌ {} (missing)", name);
            missing += 1;
        }
    }
    for name in OPTIONAL_VARS {
        if std::env::var(name).is_ok() {
            println!("✅ {} (optional)", name);
        } else {
            println!("⚪ {} (optional, unset)", name);
        }
    }

    if missing > 0 {
        eprintln!("\n❌ {} required variable(s) missing", missing);
        std::process::exit(1);
    }

    match Config::from_env() {
        Ok(config) => {
            println!(
                "\n✅ Configuration OK (symbol: {}, company: {}, threshold: {:.2}%)",
                config.symbol,
                config.company_name,
                config.trigger_threshold * 100.0
            );
        }
        Err(e) => {
            eprintln!("\n❌ {}", e);
            std::process::exit(1);
        }
    }
}
