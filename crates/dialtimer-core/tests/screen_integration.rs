//! Integration tests for the timer screen wired to a real alarm pool.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dialtimer_core::{
    AlarmError, AlarmPool, ClipSink, Config, DialDuration, Event, Screen, ScreenMode,
    StreamHandle, View,
};

#[derive(Clone, Default)]
struct CountingSink {
    rings: Arc<Mutex<u32>>,
}

impl ClipSink for CountingSink {
    fn prepare(&mut self) -> Result<(), AlarmError> {
        Ok(())
    }

    fn emit(&mut self, _volume: f32) -> Result<(), AlarmError> {
        *self.rings.lock().unwrap() += 1;
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_full_countdown_rings_until_stopped() {
    let mut config = Config::default();
    config.set_value("alarm.loops", "4").unwrap();

    let sink = CountingSink::default();
    let pool = AlarmPool::load(sink.clone(), config.clip_settings());
    let (mut screen, mut rx) = Screen::new(pool, config.screen_settings());

    screen.set_dial(DialDuration::new(0, 1, 1).unwrap());
    screen.start();
    assert_eq!(screen.display(), "00:01:01");

    while let Some(msg) = rx.recv().await {
        screen.apply(msg);
        if screen.state().mode() == ScreenMode::Finished {
            break;
        }
    }
    assert_eq!(screen.view(), View::Countdown { display: "FINISH!" });

    let events = screen.take_events();
    let ticks = events
        .iter()
        .filter(|e| matches!(e, Event::CountdownTick { .. }))
        .count();
    assert_eq!(ticks, 61);

    // Let the alarm ring twice, then stop it.
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert!(screen.alarm_stream().is_active());
    assert!(screen.stop());
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(*sink.rings.lock().unwrap(), 2);
    assert_eq!(screen.alarm_stream(), StreamHandle::None);
    assert!(screen
        .take_events()
        .iter()
        .any(|e| matches!(e, Event::AlarmStopped { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_configured_cadence_and_text() {
    let mut config = Config::default();
    config.set_value("countdown.tick_interval_ms", "500").unwrap();
    config.set_value("countdown.finished_text", "TIME").unwrap();

    let pool = AlarmPool::<CountingSink>::unloaded(config.clip_settings());
    let (mut screen, mut rx) = Screen::new(pool, config.screen_settings());
    screen.set_dial(DialDuration::new(0, 0, 1).unwrap());
    screen.start();

    let mut shown = Vec::new();
    while let Some(msg) = rx.recv().await {
        screen.apply(msg);
        shown.push(screen.display().to_string());
        if screen.state().mode() == ScreenMode::Finished {
            break;
        }
    }
    // 500ms remaining still renders as zero whole seconds
    assert_eq!(shown, vec!["00:00:00", "00:00:00", "TIME"]);
    assert_eq!(screen.alarm_stream(), StreamHandle::None);
}
