use refdrugs::process::normalize_date;
use std::env;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: normalize_dates <date> [<date> ...]");
        std::process::exit(1);
    }
    for raw in &args {
        println!("{:?} -> {:?}", raw, normalize_date(Some(raw.as_str())));
    }
}
