//!
//! Scenario tests driving a real server over loopback TCP with a hand-rolled client.

use cobble_packet::frame;
use cobble_packet::v765::config::ConfigDisconnect;
use cobble_packet::v765::handshake::{Handshake, NextState, LEGACY_PING_SENTINEL};
use cobble_packet::v765::login::{LoginAcknowledged, LoginStart, LoginSuccess};
use cobble_packet::v765::status::{PingRequest, PingResponse, StatusRequest, StatusResponse};
use cobble_packet::Packet;
use cobble_protocol::id::offline_uuid;
use cobble_protocol::types::{VarInt, VarString};
use cobble_protocol::ProtocolRead;
use cobble_server::{Server, ServerProperties, Session};

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

fn test_server(motd: &str) -> (Server, SocketAddr) {
    let mut properties = ServerProperties::default();
    properties.server_ip = String::from("127.0.0.1");
    properties.server_port = 0;
    properties.motd = String::from(motd);

    let server = Server::bind(properties, None).expect("bind should succeed");
    let addr = server.local_addr().expect("listener should have an address");

    (server, addr)
}

fn connect(addr: SocketAddr) -> TcpStream {
    let stream = TcpStream::connect(addr).expect("connect should succeed");
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("timeout should apply");
    stream
}

fn send<P: Packet>(stream: &mut TcpStream, packet: &P) {
    let mut scratch = Vec::new();
    frame::write_packet(packet, stream, &mut scratch).expect("send should succeed");
}

fn recv<P: Packet>(stream: &mut TcpStream) -> P {
    let mut scratch = Vec::new();
    frame::read_frame(stream, &mut scratch).expect("frame should arrive");

    let mut body = &scratch[..];
    let id = VarInt::read_from(&mut body).expect("packet id should decode");
    assert_eq!(id, P::protocol_id(), "unexpected packet id");

    P::read_body(&mut body).expect("packet body should decode")
}

fn expect_eof(stream: &mut TcpStream) {
    let mut rest = Vec::new();
    stream
        .read_to_end(&mut rest)
        .expect("peer should close cleanly");
    assert!(rest.is_empty(), "unexpected trailing bytes: {rest:?}");
}

fn handshake(next_state: NextState) -> Handshake {
    Handshake {
        protocol_version: VarInt::from(765),
        server_address: VarString::from("localhost"),
        server_port: 25565,
        next_state,
    }
}

#[test]
fn status_handshake() {
    let (server, addr) = test_server("Hello world");

    let accepting = thread::spawn(move || {
        let session = server.accept().expect("accept should succeed");
        Session::login(&session).expect("status exchange should end gracefully");
        server
    });

    let mut client = connect(addr);

    send(&mut client, &handshake(NextState::Status));
    send(&mut client, &StatusRequest);

    let response: StatusResponse = recv(&mut client);
    let document: serde_json::Value =
        serde_json::from_str(&response.json.0).expect("status response should be JSON");

    assert_eq!(document["description"]["text"], "Hello world");
    assert_eq!(document["players"]["max"], 20);
    assert_eq!(document["players"]["online"], 0);
    assert_eq!(document["version"]["name"], "1.20.4");
    assert_eq!(document["version"]["protocol"], 765);
    assert_eq!(document["favicon"], "");

    send(
        &mut client,
        &PingRequest {
            payload: 1_234_567_890,
        },
    );

    let pong: PingResponse = recv(&mut client);
    assert_eq!(pong.payload, 1_234_567_890);

    // the connection closes after the pong
    expect_eof(&mut client);

    let server = accepting.join().expect("accept thread should finish");
    assert_eq!(server.client_count(), 0);
}

#[test]
fn legacy_client_closed_without_reply() {
    let (server, addr) = test_server("A Minecraft Server");

    let accepting = thread::spawn(move || {
        let session = server.accept().expect("accept should succeed");
        Session::login(&session).expect("legacy probe should end gracefully");
        server
    });

    let mut client = connect(addr);
    client
        .write_all(&[LEGACY_PING_SENTINEL])
        .expect("write should succeed");

    expect_eof(&mut client);

    let server = accepting.join().expect("accept thread should finish");
    assert_eq!(server.client_count(), 0);
}

#[test]
fn login_then_unimplemented_disconnect() {
    let (server, addr) = test_server("A Minecraft Server");

    let accepting = thread::spawn(move || {
        let session = server.accept().expect("accept should succeed");
        Session::login(&session).expect("login should succeed");
        server
    });

    let mut client = connect(addr);

    send(&mut client, &handshake(NextState::Login));
    send(
        &mut client,
        &LoginStart {
            name: VarString::from("Notch"),
            uuid: uuid::Uuid::nil(),
        },
    );

    let success: LoginSuccess = recv(&mut client);
    assert_eq!(success.uuid, offline_uuid(b"Notch"));
    assert_eq!(success.username.0, "Notch");

    send(&mut client, &LoginAcknowledged);

    let server = accepting.join().expect("accept thread should finish");
    assert_eq!(server.client_count(), 1);

    // schedule the registered session's tick; the worker blocks until our next packet
    server.tick();

    // any configuration-state packet gets the canned disconnect
    client
        .write_all(&[0x02, 0x00, 0x00])
        .expect("write should succeed");

    let disconnect: ConfigDisconnect = recv(&mut client);
    assert_eq!(disconnect.reason.0, "{\"text\":\"Unimplemented\"}");

    expect_eof(&mut client);

    // removal from the registry happens on the worker; give it a moment
    let deadline = Instant::now() + Duration::from_secs(5);
    while server.client_count() > 0 {
        assert!(Instant::now() < deadline, "client never deregistered");
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn second_status_connection_sees_online_player() {
    let (server, addr) = test_server("A Minecraft Server");

    let accepting = thread::spawn(move || {
        let session = server.accept().expect("accept should succeed");
        Session::login(&session).expect("login should succeed");

        let session = server.accept().expect("accept should succeed");
        Session::login(&session).expect("status exchange should end gracefully");

        server
    });

    let mut player = connect(addr);
    send(&mut player, &handshake(NextState::Login));
    send(
        &mut player,
        &LoginStart {
            name: VarString::from("jeb_"),
            uuid: uuid::Uuid::nil(),
        },
    );
    let _: LoginSuccess = recv(&mut player);
    send(&mut player, &LoginAcknowledged);

    let mut watcher = connect(addr);
    send(&mut watcher, &handshake(NextState::Status));
    send(&mut watcher, &StatusRequest);

    let response: StatusResponse = recv(&mut watcher);
    let document: serde_json::Value =
        serde_json::from_str(&response.json.0).expect("status response should be JSON");

    assert_eq!(document["players"]["online"], 1);

    send(&mut watcher, &PingRequest { payload: 7 });
    let _: PingResponse = recv(&mut watcher);

    let server = accepting.join().expect("accept thread should finish");
    assert_eq!(server.client_count(), 1);

    drop(player);
}
