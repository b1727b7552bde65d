use super::{context_at, context_with};
use crate::conf::PipelineConfig;
use crate::pipeline::lines::decode_line;
use crate::pipeline::{Line, LineReader, LineWindow, flush_line_windows};
use crate::runtime::StopToken;
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn texts(window: &LineWindow) -> Vec<String> {
    window.lines().iter().map(|l| l.text.clone()).collect()
}

#[test]
fn lines_within_one_second_share_a_window() {
    let (ctx, _clock) = context_at(100);
    let reader = LineReader::new(ctx.clone());

    reader.push_line("GET /api HTTP/1.1".into());
    reader.push_line("X-Trace-ID: abc".into());
    reader.push_line(String::new());

    assert_eq!(ctx.filling_lines.len(), 1);
    let (key, window) = ctx.filling_lines.oldest().unwrap();
    assert_eq!(key, 100);
    assert_eq!(window.len(), 3);
    assert!(window.lines().iter().all(|line| line.received_at == 100));
    assert!(ctx.ready_lines.is_empty());
    assert_eq!(ctx.counters.lines_read.get(), 3);
}

#[test]
fn message_is_not_split_across_a_second_boundary() {
    let (ctx, clock) = context_at(100);
    let reader = LineReader::new(ctx.clone());

    reader.push_line("GET /api HTTP/1.1".into());
    clock.set(101);
    reader.push_line("X-Trace-ID: abc".into());
    reader.push_line(String::new());
    reader.push_line(String::new());

    // still the first window: no message boundary followed by a new message yet
    assert_eq!(ctx.filling_lines.len(), 1);
    assert_eq!(ctx.filling_lines.oldest_key(), Some(100));

    reader.push_line("HTTP/1.1 200 OK".into());

    let (ready_key, ready) = ctx.ready_lines.oldest().unwrap();
    assert_eq!(ready_key, 100);
    assert_eq!(
        texts(&ready),
        vec!["GET /api HTTP/1.1", "X-Trace-ID: abc", "", ""]
    );
    assert_eq!(ctx.filling_lines.oldest_key(), Some(101));
    assert_eq!(texts(&ctx.filling_lines.oldest().unwrap().1), vec!["HTTP/1.1 200 OK"]);
}

#[test]
fn window_key_follows_configured_width() {
    let config = PipelineConfig {
        line_window_seconds: 5,
        output_interval_seconds: 60,
        ..PipelineConfig::default()
    };
    let (ctx, _clock) = context_with(config, 123);
    let reader = LineReader::new(ctx.clone());

    reader.push_line("GET / HTTP/1.1".into());

    assert_eq!(ctx.filling_lines.oldest_key(), Some(120));
}

#[test]
fn run_flushes_last_window_at_end_of_input() {
    let (ctx, _clock) = context_at(50);
    let input = Cursor::new("GET /a HTTP/1.1\r\nX-Trace-ID: t1\r\n\r\n");

    LineReader::new(ctx.clone()).run(input, &StopToken::new());

    assert!(ctx.filling_lines.is_empty());
    let (key, window) = ctx.ready_lines.oldest().unwrap();
    assert_eq!(key, 50);
    assert_eq!(texts(&window), vec!["GET /a HTTP/1.1", "X-Trace-ID: t1", ""]);
}

#[test]
fn run_stops_on_request() {
    let (ctx, _clock) = context_at(50);
    let stop = StopToken::new();
    stop.request_stop();

    LineReader::new(ctx.clone()).run(Cursor::new("GET /a HTTP/1.1\n"), &stop);

    assert_eq!(ctx.counters.lines_read.get(), 0);
    assert!(ctx.filling_lines.is_empty());
}

#[test]
fn flush_waits_for_reused_ready_key_to_be_parsed() {
    let (ctx, _clock) = context_at(0);
    let line = |text: &str| Line {
        text: text.to_string(),
        received_at: 7,
    };

    let earlier = Arc::new(LineWindow::new(7));
    earlier.push(line("first"));
    ctx.ready_lines.add(7, earlier.clone());

    let filling = Arc::new(LineWindow::new(7));
    filling.push(line("second"));
    ctx.filling_lines.add(7, filling.clone());

    // stands in for the parser finishing the earlier window
    let consumer = {
        let ctx = ctx.clone();
        let earlier = earlier.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            ctx.ready_lines.remove(&earlier);
        })
    };

    flush_line_windows(&ctx);
    consumer.join().unwrap();

    assert!(ctx.filling_lines.is_empty());
    let (_, ready) = ctx.ready_lines.oldest().unwrap();
    assert!(Arc::ptr_eq(&ready, &filling));
    assert_eq!(texts(&earlier), vec!["first"]);
    assert_eq!(texts(&ready), vec!["second"]);
}

#[test]
fn closed_reader_drops_lines_and_opens_no_window() {
    let (ctx, clock) = context_at(100);
    let reader = LineReader::new(ctx.clone());
    let control = reader.clone();

    assert!(reader.push_line("GET /a HTTP/1.1".into()));
    assert!(reader.push_line(String::new()));

    control.close();
    assert!(reader.is_closed());
    assert!(ctx.filling_lines.is_empty());
    assert_eq!(ctx.ready_lines.oldest_key(), Some(100));

    // would normally start a new window at 101
    clock.set(101);
    assert!(!reader.push_line("HTTP/1.1 200 OK".into()));

    assert!(ctx.filling_lines.is_empty());
    assert_eq!(ctx.ready_lines.len(), 1);
    assert_eq!(ctx.counters.lines_read.get(), 2);
}

#[test]
fn close_racing_with_push_leaves_no_filling_window() {
    let (ctx, clock) = context_at(100);
    let reader = LineReader::new(ctx.clone());
    reader.push_line("GET /a HTTP/1.1".into());
    reader.push_line(String::new());
    clock.set(101);

    let pusher = {
        let reader = reader.clone();
        thread::spawn(move || {
            for i in 0..200 {
                reader.push_line(format!("GET /{i} HTTP/1.1"));
                reader.push_line(String::new());
            }
        })
    };
    reader.close();
    pusher.join().unwrap();

    assert!(ctx.filling_lines.is_empty());
    let ready_lines: usize = (100..=101)
        .filter_map(|key| ctx.ready_lines.get(key))
        .map(|window| window.len())
        .sum();
    assert_eq!(ready_lines as u64, ctx.counters.lines_read.get());
}

#[test]
fn run_closes_the_reader_at_end_of_input() {
    let (ctx, _clock) = context_at(50);
    let reader = LineReader::new(ctx.clone());

    reader.run(Cursor::new("GET /a HTTP/1.1\n\n"), &StopToken::new());

    assert!(reader.is_closed());
    assert!(!reader.push_line("late".into()));
}

#[test]
fn decode_strips_line_terminators() {
    assert_eq!(decode_line(b"abc\r\n"), "abc");
    assert_eq!(decode_line(b"abc\n"), "abc");
    assert_eq!(decode_line(b"abc"), "abc");
    assert_eq!(decode_line(b"\r\n"), "");
    assert_eq!(decode_line(b"a\xffb\n"), "a\u{fffd}b");
}
