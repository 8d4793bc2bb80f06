//! Two sessions talking through an in-memory relay that echoes every frame
//! to every connected client, sender included.

use game_core::*;
use glam::Vec2;
use proto::{BallDirectionPayload, Message, Sender, Topic};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

type Wire = Rc<RefCell<VecDeque<String>>>;

struct RelayTransport {
    wire: Wire,
    log: Rc<RefCell<Vec<String>>>,
}

impl Transport for RelayTransport {
    fn send_text(&self, frame: &str) -> Result<(), TransportError> {
        self.wire.borrow_mut().push_back(frame.to_string());
        self.log.borrow_mut().push(frame.to_string());
        Ok(())
    }
}

struct Relay {
    wire: Wire,
    log: Rc<RefCell<Vec<String>>>,
}

impl Relay {
    fn new() -> Self {
        Self {
            wire: Wire::default(),
            log: Rc::default(),
        }
    }

    fn connect(&self, config: Config, seed: u64) -> Session {
        let mut session = Session::with_rng(config, Box::new(NullRenderer), GameRng::new(seed));
        session
            .attach(Box::new(NetworkBus::new(RelayTransport {
                wire: self.wire.clone(),
                log: self.log.clone(),
            })))
            .unwrap();
        session
    }

    /// Deliver queued frames to everyone until the wire is quiet
    fn flush(&self, sessions: &mut [&mut Session]) {
        loop {
            let next = self.wire.borrow_mut().pop_front();
            let Some(frame) = next else { break };
            for session in sessions.iter_mut() {
                session.receive_frame(&frame);
            }
        }
    }

    fn sent(&self, topic: Topic) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|frame| proto::peek_topic(frame).ok() == Some(topic))
            .count()
    }

    fn inject(&self, msg: Message) {
        self.wire.borrow_mut().push_back(msg.to_json().unwrap());
    }
}

/// Run both clocks forward in lockstep, relaying after every slice
fn run(relay: &Relay, a: &mut Session, b: &mut Session, from_ms: u64, to_ms: u64) {
    let mut now = from_ms;
    while now <= to_ms {
        a.advance(now);
        b.advance(now);
        relay.flush(&mut [&mut *a, &mut *b]);
        now += 10;
    }
}

fn handshake(relay: &Relay, creator: &mut Session, guest: &mut Session) {
    creator.create_game("alice", true).unwrap();
    run(relay, creator, guest, 0, 250);

    let invite = guest.take_events();
    assert_eq!(
        invite,
        vec![SessionEvent::JoinAvailable {
            host: "alice".into()
        }]
    );

    guest.join_game("bob").unwrap();
    relay.flush(&mut [&mut *creator, &mut *guest]);
}

#[test]
fn test_handshake_assigns_sides() {
    let relay = Relay::new();
    let mut creator = relay.connect(Config::default(), 1);
    let mut guest = relay.connect(Config::default(), 2);

    handshake(&relay, &mut creator, &mut guest);

    assert_eq!(creator.state(), SessionState::Playing);
    assert_eq!(guest.state(), SessionState::Playing);
    assert_eq!(creator.my_side(), Side::Left);
    assert_eq!(guest.my_side(), Side::Right);
    assert_eq!(creator.role(), Some(Role::Creator));
    assert_eq!(guest.role(), Some(Role::Guest));
    assert!(!creator.is_timer_running(TimerKind::Announce));

    assert!(creator
        .take_events()
        .contains(&SessionEvent::GameStarted { side: Side::Left }));
    assert!(guest
        .take_events()
        .contains(&SessionEvent::GameStarted { side: Side::Right }));
}

#[test]
fn test_announcing_stops_after_accept() {
    let relay = Relay::new();
    let mut creator = relay.connect(Config::default(), 1);
    let mut guest = relay.connect(Config::default(), 2);

    handshake(&relay, &mut creator, &mut guest);
    let asks = relay.sent(Topic::AskJoin);
    run(&relay, &mut creator, &mut guest, 260, 2000);

    assert_eq!(relay.sent(Topic::AskJoin), asks);
    assert_eq!(relay.sent(Topic::AcceptJoin), 1);
}

#[test]
fn test_replayed_accept_changes_nothing() {
    let relay = Relay::new();
    let mut creator = relay.connect(Config::default(), 1);
    let mut guest = relay.connect(Config::default(), 2);
    handshake(&relay, &mut creator, &mut guest);
    creator.take_events();
    guest.take_events();

    let accept = relay.log.borrow().iter().rev().find(|f| f.contains("ACCEPT_JOIN")).cloned();
    relay.wire.borrow_mut().push_back(accept.unwrap());
    relay.flush(&mut [&mut creator, &mut guest]);

    assert_eq!(creator.my_side(), Side::Left);
    assert_eq!(guest.my_side(), Side::Right);
    assert!(creator.take_events().is_empty());
    assert!(guest.take_events().is_empty());
}

#[test]
fn test_paddle_direction_reaches_the_peer() {
    let relay = Relay::new();
    let mut creator = relay.connect(Config::default(), 1);
    let mut guest = relay.connect(Config::default(), 2);
    handshake(&relay, &mut creator, &mut guest);

    assert!(creator.handle_key("s"));
    relay.flush(&mut [&mut creator, &mut guest]);
    assert_eq!(guest.opp_paddle().direction, Direction::Down);
    assert_eq!(guest.my_paddle().direction, Direction::Idle);

    assert!(guest.handle_key("ArrowUp"));
    relay.flush(&mut [&mut creator, &mut guest]);
    assert_eq!(creator.opp_paddle().direction, Direction::Up);
    assert_eq!(creator.my_paddle().direction, Direction::Down);
}

#[test]
fn test_paddles_stay_in_lockstep() {
    let relay = Relay::new();
    let mut creator = relay.connect(Config::default(), 1);
    let mut guest = relay.connect(Config::default(), 2);
    handshake(&relay, &mut creator, &mut guest);

    creator.handle_key("s");
    guest.handle_key("w");
    relay.flush(&mut [&mut creator, &mut guest]);
    run(&relay, &mut creator, &mut guest, 260, 1260);

    assert_eq!(creator.paddle(Side::Left).y, guest.paddle(Side::Left).y);
    assert_eq!(creator.paddle(Side::Right).y, guest.paddle(Side::Right).y);
}

#[test]
fn test_paddle_hit_snaps_the_peer() {
    let relay = Relay::new();
    let mut creator = relay.connect(Config::default(), 1);
    let mut guest = relay.connect(Config::default(), 2);
    handshake(&relay, &mut creator, &mut guest);

    // Guest reports a hit the creator never simulated
    relay.inject(Message::ChangeBallDirection(BallDirectionPayload {
        sender: guest.identity().unwrap().sender(),
        delta_x: -7.0,
        delta_y: 5.0,
        ball_x: 494.0,
        ball_y: 70.0,
        paddle_y: 61.0,
    }));
    relay.flush(&mut [&mut creator, &mut guest]);

    assert_eq!(creator.ball().pos, Vec2::new(494.0, 70.0));
    assert_eq!(creator.ball().vel, Vec2::new(-7.0, 5.0));
    assert_eq!(creator.opp_paddle().y, 61.0);
    // The reporter ignores its own echo
    assert_eq!(*guest.ball(), Ball::default());
}

#[test]
fn test_later_ball_report_wins() {
    let relay = Relay::new();
    let mut creator = relay.connect(Config::default(), 1);
    let mut guest = relay.connect(Config::default(), 2);
    handshake(&relay, &mut creator, &mut guest);

    for ball_x in [300.0, 310.0] {
        relay.inject(Message::ChangeBallDirection(BallDirectionPayload {
            sender: Sender::new("bob"),
            delta_x: 7.0,
            delta_y: -5.0,
            ball_x,
            ball_y: 100.0,
            paddle_y: 50.0,
        }));
    }
    relay.flush(&mut [&mut creator]);

    assert_eq!(creator.ball().pos, Vec2::new(310.0, 100.0));
}

#[test]
fn test_same_name_collides_without_tokens() {
    let config = Config {
        mint_session_token: false,
        ..Config::default()
    };
    let relay = Relay::new();
    let mut creator = relay.connect(config.clone(), 1);
    let mut guest = relay.connect(config, 2);

    creator.create_game("sam", true).unwrap();
    run(&relay, &mut creator, &mut guest, 0, 250);
    guest.join_game("sam").unwrap();
    relay.flush(&mut [&mut creator, &mut guest]);

    // Both think the AcceptJoin was their own and take the right paddle
    assert_eq!(creator.state(), SessionState::Playing);
    assert_eq!(creator.my_side(), Side::Right);
    assert_eq!(guest.my_side(), Side::Right);
}

#[test]
fn test_same_name_separated_by_tokens() {
    let relay = Relay::new();
    let mut creator = relay.connect(Config::default(), 1);
    let mut guest = relay.connect(Config::default(), 2);

    creator.create_game("sam", true).unwrap();
    run(&relay, &mut creator, &mut guest, 0, 250);
    assert_eq!(
        guest.take_events(),
        vec![SessionEvent::JoinAvailable { host: "sam".into() }]
    );
    guest.join_game("sam").unwrap();
    relay.flush(&mut [&mut creator, &mut guest]);

    assert_eq!(creator.my_side(), Side::Left);
    assert_eq!(guest.my_side(), Side::Right);
}

#[test]
fn test_garbage_on_the_wire_is_survivable() {
    let relay = Relay::new();
    let mut creator = relay.connect(Config::default(), 1);
    let mut guest = relay.connect(Config::default(), 2);
    handshake(&relay, &mut creator, &mut guest);

    relay.wire.borrow_mut().push_back("{oops".into());
    relay.wire.borrow_mut().push_back(r#"{"topic":"PING","payload":{}}"#.into());
    relay.flush(&mut [&mut creator, &mut guest]);
    run(&relay, &mut creator, &mut guest, 260, 500);

    assert_eq!(creator.state(), SessionState::Playing);
    assert_eq!(guest.state(), SessionState::Playing);
}

#[test]
fn test_single_player_rally_runs_without_a_relay() {
    let mut session = Session::with_rng(Config::default(), Box::new(NullRenderer), GameRng::new(3));
    session.create_game("solo", false).unwrap();
    session.take_events();

    let mut now = 0;
    while now <= 20_000 {
        session.advance(now);
        now += 50;
    }

    let events = session.take_events();
    assert!(events.contains(&SessionEvent::BallHitWall));
    let ball = session.ball();
    assert!(ball.pos.y > -Params::BALL_RADIUS && ball.pos.y < Params::BOARD_HEIGHT + Params::BALL_RADIUS);
    for side in [Side::Left, Side::Right] {
        let y = session.paddle(side).y;
        assert!((-Params::PADDLE_STEP..=Params::BOARD_HEIGHT - Params::PADDLE_HEIGHT + Params::PADDLE_STEP).contains(&y));
    }
}
