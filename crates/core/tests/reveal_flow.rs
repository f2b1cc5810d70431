use std::time::Duration;

use tokio::time::Instant;
use yaac_core::{
    ChatSession, ChatSettings, LayoutMeasurements, MessageId, RevealEvent, RevealHandle, Role,
    start_reveal,
};

const FULL_VIEWPORT: LayoutMeasurements = LayoutMeasurements::new(552., 900., 48.);
const ROOMY_VIEWPORT: LayoutMeasurements = LayoutMeasurements::new(552., 48., 48.);

fn session() -> ChatSession {
    ChatSession::with_seed(ChatSettings::default(), 0x5eed)
}

/// Runs the worker on tokio and applies every event to `session`.
///
/// Returns the prefixes in arrival order and the id reported by `Done`.
async fn drive(
    session: &mut ChatSession,
    handle: RevealHandle,
) -> (Vec<String>, Option<MessageId>) {
    let RevealHandle { mut stream, worker } = handle;
    let worker = tokio::spawn(worker);
    let mut prefixes = Vec::new();
    let mut finished = None;

    while let Some(event) = stream.recv().await {
        if let RevealEvent::Prefix { text, .. } = &event {
            prefixes.push(text.clone());
        }
        if let Some(id) = session.apply_reveal_event(event) {
            finished = Some(id);
        }
    }

    worker.await.expect("reveal worker panicked");
    (prefixes, finished)
}

#[tokio::test(start_paused = true)]
async fn hello_scenario_streams_full_canned_reply() {
    let mut session = session();
    let outcome = session.submit("hello").expect("non-blank text is accepted");

    let messages = session.store().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "hello");
    assert!(messages[0].is_user());
    assert!(!messages[0].is_streaming());
    assert_eq!(messages[1].content, "");
    assert_eq!(messages[1].role, Role::Assistant);
    assert!(messages[1].is_streaming());

    let handle = session.start_reveal(&outcome);
    let (prefixes, finished) = drive(&mut session, handle).await;

    assert_eq!(finished, Some(outcome.turn.assistant_id));
    let assistant = session
        .store()
        .get(outcome.turn.assistant_id)
        .expect("assistant message");
    assert!(!assistant.is_streaming());
    assert_eq!(assistant.content, outcome.response);
    assert!(session.responses().contains(&assistant.content));

    // Every patch is exactly one character longer than the previous one.
    let expected = outcome
        .response
        .char_indices()
        .map(|(index, ch)| outcome.response[..index + ch.len_utf8()].to_string())
        .collect::<Vec<_>>();
    assert_eq!(prefixes, expected);
}

#[tokio::test(start_paused = true)]
async fn characters_arrive_on_a_fixed_cadence() {
    let delay = Duration::from_millis(5);
    let RevealHandle { mut stream, worker } = start_reveal(MessageId::new(2), "abcd", delay);
    let started = Instant::now();
    tokio::spawn(worker);

    let mut arrivals = Vec::new();
    while let Some(event) = stream.recv().await {
        if matches!(event, RevealEvent::Prefix { .. }) {
            arrivals.push(started.elapsed());
        }
    }

    assert_eq!(
        arrivals,
        vec![delay, delay * 2, delay * 3, delay * 4],
        "reveal must not batch, skip or back off"
    );
}

#[tokio::test(start_paused = true)]
async fn two_rapid_submissions_stream_independently() {
    let mut session = session();
    let first = session.submit("first").expect("accepted");
    let second = session.submit("second").expect("accepted");

    assert_eq!(
        session.store().streaming_ids(),
        vec![first.turn.assistant_id, second.turn.assistant_id]
    );

    let ids = session.store().messages().iter().map(|m| m.id).collect::<Vec<_>>();
    assert_eq!(
        ids,
        vec![
            first.turn.user_id,
            first.turn.assistant_id,
            second.turn.user_id,
            second.turn.assistant_id,
        ]
    );
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));

    let RevealHandle {
        stream: mut first_stream,
        worker: first_worker,
    } = session.start_reveal(&first);
    let RevealHandle {
        stream: mut second_stream,
        worker: second_worker,
    } = session.start_reveal(&second);
    tokio::spawn(first_worker);
    tokio::spawn(second_worker);

    let mut finished = Vec::new();
    loop {
        let event = tokio::select! {
            Some(event) = first_stream.recv() => event,
            Some(event) = second_stream.recv() => event,
            else => break,
        };
        if let Some(id) = session.apply_reveal_event(event) {
            finished.push(id);
        }
    }

    finished.sort();
    assert_eq!(finished, vec![first.turn.assistant_id, second.turn.assistant_id]);
    assert!(session.store().streaming_ids().is_empty());

    for outcome in [&first, &second] {
        let reply = session
            .store()
            .get(outcome.turn.assistant_id)
            .expect("assistant message");
        assert_eq!(reply.content, outcome.response);
    }
    assert_eq!(
        session.store().get(second.turn.user_id).map(|m| m.content.as_str()),
        Some("second")
    );
}

#[tokio::test(start_paused = true)]
async fn completion_raises_affordance_only_when_viewport_is_full() {
    let mut session = session();

    let outcome = session.submit("short").expect("accepted");
    let handle = session.start_reveal(&outcome);
    let (_, finished) = drive(&mut session, handle).await;
    let id = finished.expect("stream finished");

    assert!(!session.complete_stream(id, &ROOMY_VIEWPORT));
    assert!(!session.show_jump_to_bottom());
    assert!(session.remaining_space(&ROOMY_VIEWPORT) > 0.);

    assert!(session.complete_stream(id, &FULL_VIEWPORT));
    assert!(session.show_jump_to_bottom());
    assert_eq!(session.remaining_space(&FULL_VIEWPORT), 0.);

    // Jumping scrolls but keeps the affordance until the user scrolls.
    let request = session.jump_to_bottom();
    assert_eq!(request.delay, Duration::ZERO);
    assert!(session.show_jump_to_bottom());
}

#[tokio::test(start_paused = true)]
async fn manual_scroll_mid_stream_hides_affordance() {
    let mut session = session();

    let earlier = session.submit("earlier").expect("accepted");
    let handle = session.start_reveal(&earlier);
    let (_, finished) = drive(&mut session, handle).await;
    session.complete_stream(finished.expect("finished"), &FULL_VIEWPORT);
    assert!(session.show_jump_to_bottom());

    let outcome = session.submit("again").expect("accepted");
    let RevealHandle { mut stream, worker } = session.start_reveal(&outcome);
    tokio::spawn(worker);

    let mut scrolled = false;
    let mut finished = None;
    while let Some(event) = stream.recv().await {
        if let Some(id) = session.apply_reveal_event(event) {
            finished = Some(id);
        }
        if !scrolled {
            session.handle_manual_scroll();
            scrolled = true;
            assert!(!session.show_jump_to_bottom());
            assert!(
                session
                    .store()
                    .get(outcome.turn.assistant_id)
                    .is_some_and(|m| m.is_streaming())
            );
        }
    }

    // The stream itself is unaffected by the scroll.
    assert_eq!(finished, Some(outcome.turn.assistant_id));
    assert!(!session.show_jump_to_bottom());
}

#[tokio::test(start_paused = true)]
async fn ids_stay_unique_across_many_submissions() {
    let mut session = session();
    let mut seen = Vec::new();

    for index in 0..50 {
        let outcome = session.submit(&format!("message {index}")).expect("accepted");
        seen.push(outcome.turn.user_id);
        seen.push(outcome.turn.assistant_id);
    }

    assert_eq!(seen.len(), 100);
    assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(session.store().len(), 100);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_before_the_next_character() {
    let RevealHandle { mut stream, worker } =
        start_reveal(MessageId::new(8), "abcdefgh", Duration::from_millis(5));
    let worker = tokio::spawn(worker);

    let mut prefixes = Vec::new();
    while let Some(event) = stream.recv().await {
        match event {
            RevealEvent::Prefix { text, .. } => {
                prefixes.push(text);
                if prefixes.len() == 3 {
                    assert!(stream.cancel());
                }
            }
            RevealEvent::Done { .. } => panic!("cancelled reveal must not finish"),
        }
    }

    worker.await.expect("reveal worker panicked");
    assert_eq!(prefixes, vec!["a", "ab", "abc"]);
    assert!(!stream.cancel());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_stream_ends_the_worker_immediately() {
    let RevealHandle { stream, worker } =
        start_reveal(MessageId::new(9), "x".repeat(1_000), Duration::from_millis(5));
    let worker = tokio::spawn(worker);
    drop(stream);

    tokio::time::timeout(Duration::from_millis(1), worker)
        .await
        .expect("worker should stop without waiting out the reveal")
        .expect("reveal worker panicked");
}

#[tokio::test(start_paused = true)]
async fn empty_response_only_finishes() {
    let RevealHandle { mut stream, worker } =
        start_reveal(MessageId::new(3), "", Duration::from_millis(5));
    tokio::spawn(worker);

    assert_eq!(
        stream.recv().await,
        Some(RevealEvent::Done {
            target: MessageId::new(3)
        })
    );
    assert_eq!(stream.recv().await, None);
}
