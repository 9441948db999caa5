//! Embedded upload page served at `/` and `/index.html`
//!
//! Plain HTML with inline CSS and script. The recent-upload list lives in the
//! browser's `localStorage`; the server keeps nothing.

#[allow(clippy::needless_raw_string_hashes)]
pub const UPLOAD_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>HS Hosting - File Upload</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
            background: linear-gradient(135deg, #1a2a6c, #b21f1f, #fdbb2d);
            color: #fff;
            min-height: 100vh;
            padding: 24px;
        }
        main { max-width: 1100px; margin: 0 auto; }
        header { text-align: center; padding: 32px 0; }
        header h1 { font-size: 2.8em; margin-bottom: 8px; }
        .cards { display: flex; flex-wrap: wrap; gap: 24px; }
        .card {
            flex: 1;
            min-width: 280px;
            padding: 24px;
            border-radius: 16px;
            background: rgba(255, 255, 255, 0.1);
            border: 1px solid rgba(255, 255, 255, 0.15);
        }
        .card h2 { margin-bottom: 16px; }
        form { display: flex; flex-direction: column; gap: 16px; }
        input[type="url"], input[type="file"] {
            padding: 12px;
            border-radius: 10px;
            border: 2px dashed rgba(255, 255, 255, 0.3);
            background: rgba(255, 255, 255, 0.08);
            color: #fff;
        }
        button {
            padding: 12px;
            border: none;
            border-radius: 10px;
            background: linear-gradient(to right, #fdbb2d, #b21f1f);
            color: #fff;
            font-weight: bold;
            cursor: pointer;
        }
        button:disabled { opacity: 0.6; cursor: not-allowed; }
        pre {
            margin-top: 12px;
            padding: 16px;
            min-height: 80px;
            border-radius: 10px;
            background: rgba(0, 0, 0, 0.25);
            white-space: pre-wrap;
            word-break: break-all;
        }
        .ok { color: #4ade80; }
        .err { color: #f87171; }
        a { color: #fdbb2d; word-break: break-all; }
        ul.history { list-style: none; margin-top: 12px; }
        ul.history li { padding: 6px 0; border-bottom: 1px solid rgba(255, 255, 255, 0.1); }
        footer { text-align: center; margin-top: 32px; opacity: 0.8; }
    </style>
</head>
<body>
<main>
    <header>
        <h1>HS Hosting</h1>
        <p>Upload a file or import one from a URL and get a shareable link.</p>
    </header>

    <section class="cards">
        <div class="card">
            <h2>Upload a file</h2>
            <form id="file-form">
                <input type="file" id="file-input" name="file" required>
                <small>Maximum size 20MB</small>
                <button type="submit" id="file-button">Upload</button>
            </form>
        </div>
        <div class="card">
            <h2>Import from URL</h2>
            <form id="url-form">
                <input type="url" id="url-input" placeholder="https://example.com/image.jpg" required>
                <button type="submit" id="url-button">Import</button>
            </form>
        </div>
    </section>

    <section class="card" style="margin-top: 24px;">
        <h2>Result</h2>
        <pre id="result">Nothing uploaded yet.</pre>
        <p id="link"></p>
    </section>

    <section class="card" style="margin-top: 24px;">
        <h2>Recent uploads <button type="button" id="clear-history">Clear</button></h2>
        <ul class="history" id="history"></ul>
    </section>

    <footer>Files are stored by the hosting service; this page only relays them.</footer>
</main>
<script>
(function () {
    const MAX_BYTES = 20 * 1024 * 1024;
    const HISTORY_KEY = "hs-edge-history";
    const HISTORY_LIMIT = 20;

    const result = document.getElementById("result");
    const link = document.getElementById("link");
    const historyList = document.getElementById("history");

    function loadHistory() {
        try {
            return JSON.parse(localStorage.getItem(HISTORY_KEY)) || [];
        } catch (e) {
            return [];
        }
    }

    function saveHistory(entries) {
        try {
            localStorage.setItem(HISTORY_KEY, JSON.stringify(entries.slice(0, HISTORY_LIMIT)));
        } catch (e) {
            // storage full or disabled; history is best effort
        }
    }

    function renderHistory() {
        historyList.textContent = "";
        for (const entry of loadHistory()) {
            const item = document.createElement("li");
            const anchor = document.createElement("a");
            anchor.href = entry.url;
            anchor.target = "_blank";
            anchor.textContent = entry.filename || entry.url;
            item.appendChild(anchor);
            item.appendChild(document.createTextNode(" " + new Date(entry.at).toLocaleString()));
            historyList.appendChild(item);
        }
    }

    function show(data, ok) {
        result.className = ok ? "ok" : "err";
        result.textContent = typeof data === "string" ? data : JSON.stringify(data, null, 2);
        link.textContent = "";
        if (ok && data && data.url) {
            const anchor = document.createElement("a");
            anchor.href = data.url;
            anchor.target = "_blank";
            anchor.textContent = data.url;
            link.appendChild(anchor);
            const entries = loadHistory();
            entries.unshift({ url: data.url, filename: data.filename, at: Date.now() });
            saveHistory(entries);
            renderHistory();
        }
    }

    async function send(request, button) {
        button.disabled = true;
        result.className = "";
        result.textContent = "Working...";
        try {
            const response = await request;
            const data = await response.json().catch(() => ({ error: "HTTP " + response.status }));
            if (!response.ok || data.error) {
                show("Error: " + (data.error || response.status), false);
            } else {
                show(data, true);
            }
        } catch (e) {
            show("Error: " + e.message, false);
        } finally {
            button.disabled = false;
        }
    }

    document.getElementById("file-form").addEventListener("submit", function (event) {
        event.preventDefault();
        const file = document.getElementById("file-input").files[0];
        if (!file) {
            show("Error: choose a file first", false);
            return;
        }
        if (file.size > MAX_BYTES) {
            show("Error: File size exceeds 20MB limit", false);
            return;
        }
        const form = new FormData();
        form.append("file", file);
        send(fetch("/upload", { method: "POST", body: form }), document.getElementById("file-button"));
    });

    document.getElementById("url-form").addEventListener("submit", function (event) {
        event.preventDefault();
        const value = document.getElementById("url-input").value.trim();
        if (!value) {
            show("Error: enter a URL", false);
            return;
        }
        send(fetch("/hosturl?url=" + encodeURIComponent(value)), document.getElementById("url-button"));
    });

    document.getElementById("clear-history").addEventListener("click", function () {
        saveHistory([]);
        renderHistory();
    });

    renderHistory();
})();
</script>
</body>
</html>
"##;
