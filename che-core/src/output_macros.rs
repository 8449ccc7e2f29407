//! Output macros for user-facing CLI text.
//!
//! These keep a consistent surface across all crates: progress and
//! results on stdout, warnings and errors on stderr. Message templates
//! come from the `che-messages` catalog and are rendered with `msg!`.

#[macro_export]
macro_rules! che_println {
    () => {
        println!();
    };
    ($($arg:tt)*) => {
        println!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! che_error {
    ($($arg:tt)*) => {
        eprintln!("❌ {}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! che_warning {
    ($($arg:tt)*) => {
        eprintln!("⚠ {}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! che_success {
    ($($arg:tt)*) => {
        println!("✓ {}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! che_info {
    ($($arg:tt)*) => {
        eprintln!("ℹ {}", format!($($arg)*));
    }
}
