use worker::*;

// Export the Durable Object from relay_do
pub use relay_do::RelayDO;

/// Everyone meets in one relay object; it doubles as the waiting room
const ROOM: &str = "lobby";

#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: worker::Context) -> Result<Response> {
    let router = Router::new();

    router
        .get_async("/", handle_index)
        .get_async("/ws", handle_ws)
        .get("/status", handle_status)
        .run(req, env)
        .await
}

async fn handle_index(_req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    // The wasm package is expected next to this page under ./pkg
    let html = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Pong</title>
    <style>
        body { margin: 0; padding: 0; display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; background: #1a1a1a; color: #fff; font-family: monospace; }
        svg { border: 2px solid #444; background: #000; }
        #ui { margin-top: 20px; text-align: center; }
        #status { margin: 10px 0; padding: 10px; background: #333; border-radius: 4px; }
        input, button { padding: 8px 16px; margin: 5px; font-family: monospace; font-size: 14px; }
        button { background: #4a9eff; color: white; border: none; border-radius: 4px; cursor: pointer; }
        button:hover { background: #5aaeff; }
        button:disabled { background: #666; cursor: not-allowed; }
    </style>
</head>
<body>
    <svg id="board" width="600" height="400" viewBox="0 0 600 400">
        <rect id="left-paddle" x="50" y="100" width="10" height="40" fill="#fff"></rect>
        <rect id="right-paddle" x="500" y="50" width="10" height="40" fill="#fff"></rect>
        <circle id="ball" cx="225" cy="50" r="6" fill="#fff"></circle>
    </svg>
    <div id="ui">
        <div id="status">Loading WASM...</div>
        <div>
            <input type="text" id="playerId" placeholder="Your name" maxlength="24">
            <button id="soloBtn" disabled>Play the bot</button>
            <button id="createBtn" disabled>Create game</button>
            <button id="joinBtn" disabled>Join</button>
        </div>
        <div>
            <label><input type="checkbox" id="assist"> Bot plays for me</label>
        </div>
        <div style="margin-top: 10px; font-size: 12px; color: #888;">
            Controls: W/S or arrows (move), D (stop)
        </div>
    </div>
    <script type="module">
        import init, { PongClient } from './pkg/client_wasm.js';

        const $ = (id) => document.getElementById(id);
        let client = null;
        let invite = null;

        function updateStatus(msg) {
            $('status').textContent = msg;
        }

        function playerId() {
            const name = $('playerId').value.trim();
            if (!name) { updateStatus('Enter a name first'); return null; }
            return name;
        }

        function attempt(action) {
            try { action(); } catch (e) { updateStatus('Error: ' + e.message); }
        }

        function connect() {
            const scheme = location.protocol === 'https:' ? 'wss' : 'ws';
            const ws = new WebSocket(`${scheme}://${location.host}/ws`);
            ws.onopen = () => {
                try {
                    client.attach_socket(ws);
                    $('createBtn').disabled = false;
                    updateStatus('Connected');
                } catch (e) {
                    updateStatus('Connected, but a solo game is already running');
                }
            };
            ws.onmessage = (e) => { if (typeof e.data === 'string') client.receive_frame(e.data); };
            ws.onclose = () => updateStatus('Disconnected from relay');
        }

        function frame(t) {
            client.advance(t);
            const host = client.take_join_invite();
            if (host) {
                invite = host;
                $('joinBtn').disabled = false;
                $('joinBtn').textContent = `Join ${host}`;
            }
            const state = client.state_string();
            if (state !== 'IDLE') {
                updateStatus(`${state} (${client.my_side()} paddle)`);
            }
            requestAnimationFrame(frame);
        }

        async function main() {
            try {
                await init();
                client = new PongClient();
                $('soloBtn').disabled = false;
                $('soloBtn').onclick = () => { const id = playerId(); if (id) attempt(() => client.create_game(id, false)); };
                $('createBtn').onclick = () => { const id = playerId(); if (id) attempt(() => client.create_game(id, true)); };
                $('joinBtn').onclick = () => { const id = playerId(); if (id && invite) attempt(() => client.join_game(id)); };
                $('assist').onchange = (e) => client.set_bot_assist(e.target.checked);
                window.addEventListener('keydown', (e) => client.key_down(e));
                updateStatus('Connecting...');
                connect();
                requestAnimationFrame(frame);
            } catch (error) {
                console.error('Error:', error);
                updateStatus('Error: ' + error.message);
            }
        }

        main();
    </script>
</body>
</html>"##;
    Response::from_html(html)
}

async fn handle_ws(req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let is_upgrade = req
        .headers()
        .get("Upgrade")?
        .is_some_and(|header| header.eq_ignore_ascii_case("websocket"));
    if !is_upgrade {
        return Response::error("Expected WebSocket upgrade request", 426);
    }

    // Get the RELAY Durable Object namespace
    let relay = ctx.env.durable_object("RELAY")?;

    // Get DO stub by name (creates if doesn't exist)
    let stub = relay.get_by_name(ROOM)?;
    stub.fetch_with_request(req).await
}

fn handle_status(_req: Request, _ctx: RouteContext<()>) -> Result<Response> {
    Response::from_json(&serde_json::json!({
        "room": ROOM,
        "socket": "/ws",
    }))
}
