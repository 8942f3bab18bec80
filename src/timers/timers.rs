use std::collections::HashMap;
use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct InnerTimer {
    start: Option<Instant>,
    elapsed: Duration,
    subtimers: SubTimersMap,
}

impl InnerTimer {
    fn reset(&mut self) {
        self.start = None;
        self.elapsed = Duration::ZERO;
        self.subtimers.clear();
    }

    fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    fn stop(&mut self) {
        if let Some(instant) = self.start.take() {
            self.elapsed += instant.elapsed();
        }
    }

    fn suspend(&mut self) {
        //bank the running time of an active timer
        //and of everything below it
        if let Some(instant) = self.start {
            self.elapsed += instant.elapsed();
            self.subtimers.suspend();
        }
    }

    fn resume(&mut self) {
        if self.start.is_some() {
            self.start = Some(Instant::now());
            self.subtimers.resume();
        }
    }
}

#[derive(Debug, Default)]
struct SubTimersMap(HashMap<&'static str, InnerTimer>);

impl Deref for SubTimersMap {
    type Target = HashMap<&'static str, InnerTimer>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for SubTimersMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl SubTimersMap {
    fn suspend(&mut self) {
        self.values_mut().for_each(|t| t.suspend());
    }

    fn resume(&mut self) {
        self.values_mut().for_each(|t| t.resume());
    }

    fn total_time(&self) -> Duration {
        self.values().map(|t| t.elapsed).sum()
    }

    fn write_to(&self, out: &mut dyn Write, depth: usize) -> std::io::Result<()> {
        // sorted by key so that output is reproducible
        let mut keys: Vec<_> = self.keys().collect();
        keys.sort();
        for key in keys {
            let t = &self[key];
            writeln!(out, "{:indent$}{} : {:?}", "", key, t.elapsed, indent = 4 * depth)?;
            t.subtimers.write_to(out, depth + 1)?;
        }
        Ok(())
    }
}

/// Nested timers, keyed by phase name.   A timer started while
/// another is running is recorded as its child.
#[derive(Default, Debug)]
pub(crate) struct Timers {
    stack: Vec<&'static str>,
    subtimers: SubTimersMap,
}

impl Timers {
    fn active_map(&mut self) -> &mut SubTimersMap {
        let mut map = &mut self.subtimers;
        for key in self.stack.iter() {
            map = &mut map.entry(*key).or_default().subtimers;
        }
        map
    }

    pub(crate) fn reset_timer(&mut self, key: &'static str) {
        self.subtimers.entry(key).or_default().reset();
    }

    pub(crate) fn start_as_current(&mut self, key: &'static str) {
        self.active_map().entry(key).or_default().start();
        self.stack.push(key);
    }

    pub(crate) fn stop_current(&mut self) {
        if let Some(key) = self.stack.pop() {
            if let Some(t) = self.active_map().get_mut(key) {
                t.stop();
            }
        }
    }

    //Used for notimeit!
    pub(crate) fn suspend(&mut self) {
        self.subtimers.suspend();
    }

    pub(crate) fn resume(&mut self) {
        self.subtimers.resume();
    }

    pub(crate) fn total_time(&self) -> Duration {
        self.subtimers.total_time()
    }

    /// Accumulated time of a top level timer, if it exists
    #[cfg(test)]
    pub(crate) fn elapsed(&self, key: &'static str) -> Option<Duration> {
        self.subtimers.get(key).map(|t| t.elapsed)
    }

    pub(crate) fn write_to(&self, out: &mut dyn Write) -> std::io::Result<()> {
        self.subtimers.write_to(out, 0)
    }
}

macro_rules! timeit {
    ($timer:ident => $key:literal; $($tt:tt)+) => {

        $timer.start_as_current($key);
        $(
            $tt
        )+
        $timer.stop_current();
    }
}
pub(crate) use timeit;

macro_rules! notimeit {
    ($timer:ident; $($tt:tt)+) => {

        $timer.suspend();
        $(
            $tt
        )+
        $timer.resume();
    }
}
pub(crate) use notimeit;

#[test]
fn test_timers_nesting() {
    let mut timers = Timers::default();

    timeit! {timers => "outer"; {
        timeit! {timers => "inner"; {
            std::thread::sleep(Duration::from_millis(2));
        }}
        notimeit! {timers; {
            std::thread::sleep(Duration::from_millis(2));
        }}
    }}

    let outer = timers.elapsed("outer").unwrap();
    assert!(outer >= Duration::from_millis(2));
    assert_eq!(timers.total_time(), outer);
    assert!(timers.elapsed("inner").is_none());

    let mut buf: Vec<u8> = Vec::new();
    timers.write_to(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with("outer : "));
    assert!(text.contains("\n    inner : "));

    timers.reset_timer("outer");
    assert_eq!(timers.elapsed("outer"), Some(Duration::ZERO));
}
