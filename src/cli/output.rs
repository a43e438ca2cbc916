use crate::common::types::DaemonStatus;

pub fn print_status(response: &str) {
    println!("      QPowerHAL Daemon Status     ");

    if response.is_empty() {
        println!("No response from daemon\n");
        return;
    }

    let status: DaemonStatus = match serde_json::from_str(response) {
        Ok(s) => s,
        Err(_) => {
            println!("{}\n", response);
            return;
        }
    };
    let hal = &status.hal;
    let flag = |on: bool| if on { "✓" } else { "✗" };

    println!("Daemon: Running (v{}, log {})\n", status.version, status.log_level);
    println!("    Config:       {}", status.config);
    println!("    SoC:          {}", hal.variant);
    println!("    Profile:      {}", hal.profile);
    match hal.interactive {
        Some(on) => println!("  {} Interactive", flag(on)),
        None => println!("    Interactive:  unknown"),
    }
    println!("  {} Display hint sent", flag(hal.display_hint_sent));
    println!("  {} Launch boost", flag(hal.launch_active));
    println!("  {} CPU boost", flag(hal.cpu_boost_active));
    println!("  {} Sustained performance", flag(hal.sustained_performance));
    println!("  {} VR mode", flag(hal.vr_mode));
    println!(
        "    Video:        encode x{}, decode x{}",
        hal.video_encode_refs, hal.video_decode_refs
    );
    if !hal.named_actions.is_empty() {
        println!("    Held hints:   {}", hal.named_actions.join(", "));
    }
    println!("    Perf locks:   {} active", hal.perflock_active);

    println!();
}

pub fn print_daemon_stopped() {
    println!("      QPowerHAL Daemon Status     ");
    println!(" Daemon: Not running\n");
}

pub fn print_success(message: &str) {
    println!(" {}", message);
}

pub fn print_error(message: &str) {
    eprintln!(" Error: {}", message);
}
