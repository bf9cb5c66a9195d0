use event_action::{Callback, Event, Interval, ManualClock};
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let clock = ManualClock::starting_now();
    let mut tick = Event::with_clock("tick", Arc::new(clock.clone()));

    let every = Callback::new(|n: &u32| println!("every tick: #{n}"));
    let slow = Callback::new(|n: &u32| println!("at most every 5s: #{n}"));

    tick.add_action(&every);
    tick.add_action_with_interval(&slow, Interval::from_secs(5));

    for n in 1..=10 {
        clock.advance(Duration::from_secs(1));
        tick.trigger(&n)?;
    }

    // 负数间隔 -> InvalidArgument
    if let Err(err) = tick.add_action_every_secs(&Callback::new(|_: &u32| {}), -1.0) {
        println!("rejected: {err}");
    }

    Ok(())
}
