//! Embedded HTML/CSS/JS frontend for the portwatch web dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. The risk map
//! and the distribution chart are drawn as inline SVG.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>portwatch - Supply Chain Intelligence</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --purple: #bc8cff;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

/* Layout */
.app { max-width: 1200px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}

header h1 { font-size: 24px; font-weight: 600; display: flex; align-items: center; gap: 10px; }
header h1 .logo { color: var(--accent); font-family: var(--mono); font-weight: 700; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.health-badges { display: flex; gap: 8px; }

.badge {
  display: inline-flex;
  align-items: center;
  gap: 4px;
  padding: 4px 10px;
  border-radius: 12px;
  font-size: 12px;
  font-weight: 500;
  background: var(--surface);
  border: 1px solid var(--border);
}

.badge.ok { border-color: var(--green); color: var(--green); }
.badge.warn { border-color: var(--yellow); color: var(--yellow); }
.badge.err { border-color: var(--red); color: var(--red); }

/* Risk badges */
.risk { padding: 2px 8px; border-radius: 10px; font-size: 12px; font-weight: 600; }
.risk.high { background: rgba(248,81,73,0.15); color: var(--red); }
.risk.medium { background: rgba(210,153,34,0.15); color: var(--yellow); }
.risk.low { background: rgba(63,185,80,0.15); color: var(--green); }

/* Navigation */
nav {
  display: flex;
  gap: 4px;
  margin-bottom: 24px;
  background: var(--surface);
  border-radius: var(--radius);
  padding: 4px;
  border: 1px solid var(--border);
}

nav button {
  flex: 1;
  padding: 8px 16px;
  border: none;
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
  transition: all 0.15s;
}

nav button:hover { color: var(--text); background: rgba(255,255,255,0.04); }
nav button.active { background: var(--accent); color: #fff; }

.panel { display: none; }
.panel.active { display: block; }

/* Cards */
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}

.card h2 { font-size: 16px; font-weight: 600; margin-bottom: 16px; }
.card h3 { font-size: 14px; font-weight: 600; margin-bottom: 12px; color: var(--text-muted); }

.two-col { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }

/* Stats grid */
.stats-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 16px;
  margin-bottom: 24px;
}

.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  text-align: center;
}

.stat-card .value {
  font-size: 32px;
  font-weight: 700;
  font-family: var(--mono);
  color: var(--accent);
  line-height: 1.1;
}

.stat-card .value.red { color: var(--red); }
.stat-card .value.purple { color: var(--purple); }

.stat-card .label {
  font-size: 12px;
  color: var(--text-muted);
  margin-top: 6px;
  text-transform: uppercase;
  letter-spacing: 0.5px;
}

/* Tables */
table { width: 100%; border-collapse: collapse; font-size: 13px; }
th, td { text-align: left; padding: 8px 12px; border-bottom: 1px solid var(--border); }
th { color: var(--text-muted); font-weight: 500; font-size: 12px; text-transform: uppercase; letter-spacing: 0.5px; }
td.num { text-align: right; font-family: var(--mono); }
th.num { text-align: right; }
tr:hover { background: rgba(255,255,255,0.02); }

/* Chat */
.transcript { max-height: 460px; overflow-y: auto; margin-bottom: 12px; }
.turn { padding: 10px 14px; border-radius: var(--radius); margin-bottom: 8px; white-space: pre-wrap; }
.turn.user { background: rgba(88,166,255,0.10); border: 1px solid rgba(88,166,255,0.3); }
.turn.assistant { background: var(--bg); border: 1px solid var(--border); }
.turn.tools { border-left: 3px solid var(--purple); }
.turn .who { font-size: 11px; color: var(--text-muted); text-transform: uppercase; margin-bottom: 4px; }
.status-line { font-size: 13px; margin: 8px 0; }
.status-line.agent_used { color: var(--green); }
.status-line.basic { color: var(--accent); }
.status-line.failed { color: var(--red); }
.history { font-size: 12px; color: var(--text-muted); }
.history div { padding: 2px 0; }

.quick-actions { display: flex; gap: 8px; flex-wrap: wrap; margin-bottom: 12px; }

/* Forms */
input, select, textarea {
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 8px 10px;
  font-family: var(--font);
  font-size: 13px;
}
textarea { width: 100%; min-height: 80px; resize: vertical; }
.row { display: flex; gap: 8px; align-items: center; margin-bottom: 12px; }
.row input[type=text] { flex: 1; }

.btn {
  padding: 8px 16px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--surface);
  color: var(--text);
  font-size: 13px;
  cursor: pointer;
}
.btn:hover { border-color: var(--accent); }
.btn.primary { background: var(--accent); border-color: var(--accent); color: #fff; }
.btn:disabled { opacity: 0.5; cursor: wait; }

.report-body { white-space: pre-wrap; background: var(--bg); border: 1px solid var(--border); border-radius: 6px; padding: 12px; margin: 12px 0; }
.muted { color: var(--text-muted); font-size: 12px; }
pre.json { font-family: var(--mono); font-size: 12px; white-space: pre-wrap; }

/* Map */
svg.map { width: 100%; height: auto; background: #0b1622; border-radius: 6px; }
svg.map .grid { stroke: #1c2b3a; stroke-width: 0.5; }
svg.map text { fill: var(--text); font-size: 10px; }

/* Toast */
.toast {
  position: fixed;
  bottom: 24px;
  right: 24px;
  background: var(--green);
  color: #fff;
  padding: 10px 20px;
  border-radius: var(--radius);
  font-size: 13px;
  opacity: 0;
  transition: opacity 0.3s;
  pointer-events: none;
}
.toast.show { opacity: 1; }
.toast.error { background: var(--red); }

@media (max-width: 768px) {
  .two-col { grid-template-columns: 1fr; }
}
</style>
</head>
<body>
<div class="app">
  <header>
    <div>
      <h1><span class="logo">portwatch</span> Supply Chain Intelligence</h1>
      <div class="subtitle">Risk monitoring and analysis backed by the AI agent service</div>
    </div>
    <div class="health-badges" id="health-badges"></div>
  </header>

  <nav id="nav">
    <button data-panel="assistant" class="active">AI Assistant</button>
    <button data-panel="dashboard">Risk Dashboard</button>
    <button data-panel="routes">Route Analysis</button>
    <button data-panel="reports">Reports</button>
  </nav>

  <!-- Assistant -->
  <section class="panel active" id="panel-assistant">
    <div class="card">
      <h2>AI Supply Chain Assistant</h2>
      <div class="quick-actions" id="quick-actions"></div>
      <div class="transcript" id="transcript"></div>
      <div class="status-line" id="chat-status"></div>
      <div class="row">
        <input type="text" id="chat-input" placeholder="Ask about port risks, routes, disasters...">
        <button class="btn primary" id="chat-send">Send</button>
        <button class="btn" id="chat-clear">Clear Conversation</button>
      </div>
    </div>
    <div class="card">
      <h3>Conversation History</h3>
      <div class="history" id="history"><span class="muted">No history yet.</span></div>
    </div>
  </section>

  <!-- Dashboard -->
  <section class="panel" id="panel-dashboard">
    <div class="stats-grid" id="kpis"></div>
    <div class="card">
      <h2>Global Port Risk Map</h2>
      <div id="map"></div>
    </div>
    <div class="two-col">
      <div class="card">
        <h2>Risk Level Distribution</h2>
        <div id="distribution"></div>
      </div>
      <div class="card">
        <h2>Highest Risk Ports</h2>
        <div id="top-ports"></div>
      </div>
    </div>
  </section>

  <!-- Routes -->
  <section class="panel" id="panel-routes">
    <div class="card">
      <h2>Shipping Route Analysis</h2>
      <div class="row">
        <label>Origin</label><select id="route-origin"></select>
        <label>Destination</label><select id="route-destination"></select>
        <button class="btn primary" id="route-analyze">Analyze Route</button>
      </div>
    </div>
    <div class="card" id="route-result-card" style="display:none">
      <div class="stats-grid" id="route-metrics"></div>
      <div id="route-analysis"></div>
      <h3 style="margin-top:16px">Follow-up Question</h3>
      <div class="row">
        <input type="text" id="route-question" placeholder="Ask about this route...">
        <button class="btn" id="route-ask">Ask</button>
      </div>
      <div id="route-follow-up"></div>
    </div>
  </section>

  <!-- Reports -->
  <section class="panel" id="panel-reports">
    <div class="two-col">
      <div class="card">
        <h2>Quick Reports</h2>
        <div class="row">
          <select id="report-type"></select>
          <button class="btn primary" id="report-generate">Generate Report</button>
        </div>
        <div class="muted" id="report-desc"></div>
        <div id="report-output"></div>
      </div>
      <div class="card">
        <h2>Custom Reports</h2>
        <textarea id="custom-focus" placeholder="e.g., Focus on climate risks, geopolitical factors, specific regions..."></textarea>
        <div class="row" style="margin-top:8px">
          <button class="btn" id="custom-generate">Generate Custom Report</button>
        </div>
        <div id="custom-output"></div>
      </div>
    </div>
  </section>
</div>

<div class="toast" id="toast"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let currentPanel = 'assistant';
let reportTypes = [];
let currentRoute = null;

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {}, credentials: 'same-origin' };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  const data = await res.json();
  if (!res.ok) throw new Error(data.error || res.statusText);
  return data;
}

function toast(msg, isError) {
  const el = document.getElementById('toast');
  el.textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 3000);
}

function esc(s) {
  return String(s).replace(/[&<>"']/g, c => ({
    '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
  }[c]));
}

function risk(n) { return (n * 100).toFixed(1) + '%'; }

async function busy(button, fn) {
  button.disabled = true;
  try { await fn(); }
  catch (e) { toast(e.message, true); }
  finally { button.disabled = false; }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------
document.getElementById('nav').addEventListener('click', e => {
  if (e.target.tagName !== 'BUTTON') return;
  const panel = e.target.dataset.panel;
  if (!panel) return;

  document.querySelectorAll('nav button').forEach(b => b.classList.remove('active'));
  e.target.classList.add('active');

  document.querySelectorAll('.panel').forEach(p => p.classList.remove('active'));
  document.getElementById('panel-' + panel).classList.add('active');

  currentPanel = panel;
  loadPanel(panel);
});

function loadPanel(panel) {
  const loaders = {
    assistant: loadAssistant,
    dashboard: loadDashboard,
    routes: loadRoutes,
    reports: loadReports,
  };
  loaders[panel]().catch(e => toast(e.message, true));
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------
async function loadStatus() {
  const el = document.getElementById('health-badges');
  try {
    const s = await api('GET', '/api/status');
    const conn = s.connected
      ? '<span class="badge ok">API connected</span>'
      : '<span class="badge err">API offline</span>';
    const agent = s.agent_initialized
      ? '<span class="badge ok">Agent ready</span>'
      : '<span class="badge warn">Agent not initialized</span>';
    el.innerHTML = conn + agent;
  } catch (e) {
    el.innerHTML = '<span class="badge err">status unavailable</span>';
  }
}

// ---------------------------------------------------------------------------
// Assistant
// ---------------------------------------------------------------------------
function renderTranscript(view) {
  const qa = document.getElementById('quick-actions');
  qa.innerHTML = view.quick_actions.map(a =>
    `<button class="btn" data-action="${esc(a.id)}" title="${esc(a.query)}">${esc(a.label)}</button>`
  ).join('');

  const t = document.getElementById('transcript');
  if (!view.turns.length) {
    t.innerHTML = '<div class="muted">Ask a question or pick a quick action to get started.</div>';
    return;
  }
  t.innerHTML = view.turns.map(turn => {
    const cls = 'turn ' + turn.role + (turn.uses_tools ? ' tools' : '');
    const who = turn.role === 'user' ? 'You' : (turn.uses_tools ? 'Assistant (used tools)' : 'Assistant');
    return `<div class="${cls}"><div class="who">${who}</div>${esc(turn.content)}</div>`;
  }).join('');
  t.scrollTop = t.scrollHeight;
}

function renderChat(chat) {
  const status = document.getElementById('chat-status');
  if (!chat) {
    status.className = 'status-line';
    status.textContent = '';
    return;
  }
  status.className = 'status-line ' + chat.status;
  status.textContent = chat.status_message;

  const h = document.getElementById('history');
  if (chat.history.length) {
    h.innerHTML = chat.history.map(turn =>
      `<div><strong>${turn.role === 'user' ? 'You' : 'AI'}:</strong> ${esc(turn.content)}</div>`
    ).join('');
  }
}

async function loadAssistant() {
  const data = await api('GET', '/api/session');
  renderTranscript(data.view);
}

async function sendChat() {
  const input = document.getElementById('chat-input');
  const message = input.value.trim();
  if (!message) return;
  input.value = '';
  await busy(document.getElementById('chat-send'), async () => {
    const data = await api('POST', '/api/chat', { message });
    renderTranscript(data.view);
    renderChat(data.chat);
  });
}

document.getElementById('chat-send').addEventListener('click', sendChat);
document.getElementById('chat-input').addEventListener('keydown', e => {
  if (e.key === 'Enter') sendChat();
});

document.getElementById('quick-actions').addEventListener('click', e => {
  const action = e.target.dataset.action;
  if (!action) return;
  busy(e.target, async () => {
    const data = await api('POST', '/api/quick_action', { action });
    renderTranscript(data.view);
    renderChat(data.chat);
  });
});

document.getElementById('chat-clear').addEventListener('click', e => {
  busy(e.target, async () => {
    const data = await api('POST', '/api/clear');
    if (data.cleared) {
      toast('Conversation cleared!');
      renderTranscript(data.view);
      renderChat(null);
      document.getElementById('history').innerHTML = '<span class="muted">No history yet.</span>';
    } else {
      toast('Could not clear conversation history', true);
    }
  });
});

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------
const LEVEL_COLORS = { HIGH: '#f85149', MEDIUM: '#d29922', LOW: '#3fb950' };

function project(lat, lon) {
  // Equirectangular onto a 720x360 viewBox
  return [(lon + 180) * 2, (90 - lat) * 2];
}

function renderMap(points) {
  let grid = '';
  for (let lon = -180; lon <= 180; lon += 30) {
    const [x] = project(0, lon);
    grid += `<line class="grid" x1="${x}" y1="0" x2="${x}" y2="360"/>`;
  }
  for (let lat = -90; lat <= 90; lat += 30) {
    const [, y] = project(lat, 0);
    grid += `<line class="grid" x1="0" y1="${y}" x2="720" y2="${y}"/>`;
  }
  const markers = points.map(p => {
    const [x, y] = project(p.lat, p.lon);
    const r = 4 + p.overall_risk * 16;
    const color = LEVEL_COLORS[p.risk_level] || '#58a6ff';
    return `<g><circle cx="${x}" cy="${y}" r="${r}" fill="${color}" fill-opacity="0.6" stroke="${color}">` +
      `<title>${esc(p.port_name)}: ${risk(p.overall_risk)} (${p.risk_level}), ${p.nearby_disasters_count} nearby disasters</title></circle>` +
      `<text x="${x + r + 2}" y="${y + 3}">${esc(p.port_name)}</text></g>`;
  }).join('');
  document.getElementById('map').innerHTML =
    `<svg class="map" viewBox="0 0 720 360" xmlns="http://www.w3.org/2000/svg">${grid}${markers}</svg>`;
}

function renderDistribution(dist) {
  const el = document.getElementById('distribution');
  const total = dist.reduce((n, d) => n + d.count, 0);
  if (!total) { el.innerHTML = '<div class="muted">No data</div>'; return; }

  // Donut chart: one arc per level
  const R = 70, C = 2 * Math.PI * R;
  let offset = 0;
  const arcs = dist.map(d => {
    const len = C * d.count / total;
    const arc = `<circle cx="100" cy="100" r="${R}" fill="none" stroke="${LEVEL_COLORS[d.level]}" stroke-width="30"` +
      ` stroke-dasharray="${len} ${C - len}" stroke-dashoffset="${-offset}" transform="rotate(-90 100 100)"/>`;
    offset += len;
    return arc;
  }).join('');
  const legend = dist.map(d =>
    `<div><span class="risk ${d.level.toLowerCase()}">${d.level}</span> ${d.count}</div>`
  ).join('');
  el.innerHTML = `<div class="row"><svg width="200" height="200" viewBox="0 0 200 200">${arcs}</svg><div>${legend}</div></div>`;
}

async function loadDashboard() {
  const s = await api('GET', '/api/dashboard');
  document.getElementById('kpis').innerHTML = `
    <div class="stat-card"><div class="value">${s.ports_monitored}</div><div class="label">Ports Monitored</div></div>
    <div class="stat-card"><div class="value">${risk(s.avg_risk)}</div><div class="label">Average Risk</div></div>
    <div class="stat-card"><div class="value red">${s.high_risk_count}</div><div class="label">High Risk Ports</div></div>
    <div class="stat-card"><div class="value purple">${s.total_news_mentions}</div><div class="label">News Mentions</div></div>`;

  renderMap(s.map_points);
  renderDistribution(s.distribution);

  document.getElementById('top-ports').innerHTML = '<table><tr><th>Port</th><th>Country</th><th class="num">Risk</th></tr>' +
    s.top_risky.map(p =>
      `<tr><td>${esc(p.port_name)}</td><td>${esc(p.country)}</td>` +
      `<td class="num"><span class="risk ${p.badge}">${risk(p.overall_risk)}</span></td></tr>`
    ).join('') + '</table>';
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------
async function loadRoutes() {
  const form = await api('GET', '/api/ports');
  const opts = sel => form.ports.map(p =>
    `<option${p === sel ? ' selected' : ''}>${esc(p)}</option>`
  ).join('');
  document.getElementById('route-origin').innerHTML = opts(form.default_origin);
  document.getElementById('route-destination').innerHTML = opts(form.default_destination);
}

function renderAnalysis(a) {
  if (a.kind === 'text') {
    const cls = a.uses_tools ? 'report-body turn tools' : 'report-body';
    return `<div class="${cls}">${esc(a.text)}</div>`;
  }
  return `<pre class="json report-body">${esc(JSON.stringify(a.fields, null, 2))}</pre>`;
}

document.getElementById('route-analyze').addEventListener('click', e => {
  const origin = document.getElementById('route-origin').value;
  const destination = document.getElementById('route-destination').value;
  busy(e.target, async () => {
    const data = await api('POST', '/api/route', { origin, destination });
    const card = document.getElementById('route-result-card');
    if (!data.result) {
      card.style.display = 'none';
      toast('Route analysis unavailable', true);
      return;
    }
    const r = data.result;
    currentRoute = r;
    toast('Route analysis completed!');
    document.getElementById('route-metrics').innerHTML = `
      <div class="stat-card"><div class="value">${risk(r.route_risk)}</div><div class="label">Route Risk</div></div>
      <div class="stat-card"><div class="value">${esc(r.risk_level)}</div><div class="label">Risk Level</div></div>
      <div class="stat-card"><div class="value">${r.agent_used ? 'Yes' : 'No'}</div><div class="label">AI Agent Used</div></div>
      <div class="stat-card"><div class="value purple">${r.analysis_type}</div><div class="label">Analysis Type</div></div>`;
    document.getElementById('route-analysis').innerHTML = renderAnalysis(r.analysis);
    document.getElementById('route-follow-up').innerHTML = '';
    card.style.display = 'block';
  });
});

document.getElementById('route-ask').addEventListener('click', e => {
  const question = document.getElementById('route-question').value.trim();
  if (!question || !currentRoute) return;
  busy(e.target, async () => {
    const chat = await api('POST', '/api/route/follow_up', {
      origin: currentRoute.origin,
      destination: currentRoute.destination,
      question,
    });
    document.getElementById('route-follow-up').innerHTML = chat.status === 'failed'
      ? `<div class="status-line failed">${esc(chat.response)}</div>`
      : `<div class="report-body">${esc(chat.response)}</div>`;
  });
});

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------
async function loadReports() {
  if (!reportTypes.length) {
    reportTypes = await api('GET', '/api/report_types');
  }
  const select = document.getElementById('report-type');
  select.innerHTML = reportTypes.map(t => `<option>${esc(t.name)}</option>`).join('');
  showReportDesc();
}

function showReportDesc() {
  const name = document.getElementById('report-type').value;
  const t = reportTypes.find(t => t.name === name);
  document.getElementById('report-desc').textContent = t ? t.description : '';
}

document.getElementById('report-type').addEventListener('change', showReportDesc);

document.getElementById('report-generate').addEventListener('click', e => {
  const report_type = document.getElementById('report-type').value;
  busy(e.target, async () => {
    const data = await api('POST', '/api/report', { report_type });
    const out = document.getElementById('report-output');
    if (!data.report) {
      out.innerHTML = '<div class="status-line failed">Report generation failed</div>';
      return;
    }
    const r = data.report;
    toast('Report generated!');
    out.innerHTML = `<div class="report-body">${esc(r.report)}</div>
      <div class="row">
        <a class="btn" href="/api/report/text" download="${esc(r.text_filename)}">Download as Text</a>
        <button class="btn" id="report-pdf">Download as PDF</button>
      </div>
      <div class="muted" id="pdf-note"></div>`;
    document.getElementById('report-pdf').addEventListener('click', downloadPdf);
  });
});

async function downloadPdf(e) {
  await busy(e.target, async () => {
    const res = await fetch('/api/report/pdf', { credentials: 'same-origin' });
    if (!res.ok) {
      const data = await res.json();
      document.getElementById('pdf-note').textContent = data.error;
      return;
    }
    const disposition = res.headers.get('Content-Disposition') || '';
    const match = disposition.match(/filename="([^"]+)"/);
    const blob = await res.blob();
    const a = document.createElement('a');
    a.href = URL.createObjectURL(blob);
    a.download = match ? match[1] : 'report.pdf';
    a.click();
    URL.revokeObjectURL(a.href);
  });
}

document.getElementById('custom-generate').addEventListener('click', e => {
  const focus = document.getElementById('custom-focus').value;
  busy(e.target, async () => {
    const chat = await api('POST', '/api/custom_report', { focus });
    const out = document.getElementById('custom-output');
    out.innerHTML = chat.status === 'failed'
      ? `<div class="status-line failed">${esc(chat.response)}</div>`
      : `<div class="status-line agent_used">Custom report generated!</div><div class="report-body">${esc(chat.response)}</div>`;
  });
});

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
loadStatus();
loadPanel(currentPanel);
</script>
</body>
</html>
"##;
