//! Embedded HTML/CSS/JS frontend for the transmitter dashboard.
//!
//! The page is compiled into the binary as a string constant. It draws only
//! what `/api/dashboard` and `/api/designs` describe; all gauge geometry is
//! computed server-side.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>FM Transmitter</title>
<style>
:root {
  --radio-dark: #0a0a0a;
  --radio-panel: #1a1a1a;
  --radio-yellow: #ffcc00;
  --radio-green: #00ff00;
  --radio-gray: #666;
  --border: #444;
  --muted: #888;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}
* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: #000; color: #fff; font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; font-size: 14px; user-select: none; }
header { display: flex; justify-content: space-between; align-items: center; padding: 10px 16px; background: var(--radio-panel); border-bottom: 1px solid var(--border); }
header h1 { color: var(--radio-yellow); font-size: 18px; }
header nav button { background: var(--radio-yellow); color: #000; border: 0; padding: 6px 12px; margin-left: 6px; font-weight: 600; cursor: pointer; }
main { padding: 16px; background: var(--radio-dark); min-height: calc(100vh - 50px); }
.grid2 { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; margin-bottom: 16px; }
.grid3 { display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 16px; margin-bottom: 16px; }
.panel { background: var(--radio-panel); padding: 12px; border: 1px solid var(--border); border-radius: 4px; }
.panel h3 { color: var(--radio-yellow); font-size: 14px; margin-bottom: 8px; text-align: center; }
.banner { color: #000; font-size: 36px; font-weight: bold; text-align: center; padding: 16px; margin-bottom: 16px; }
.labels { display: flex; justify-content: space-between; color: var(--muted); font-size: 11px; margin: 4px 0; }
.segments { display: flex; gap: 2px; height: 32px; align-items: flex-end; }
.segments div { flex: 1; border-radius: 1px; }
.readout { font-family: var(--mono); font-size: 20px; font-weight: bold; text-align: center; margin-top: 6px; }
.track { position: relative; height: 12px; background: #222; border: 1px solid #555; border-radius: 3px; overflow: hidden; }
.track .fill { height: 100%; transition: width 1s; }
.track .marker { position: absolute; top: -2px; width: 3px; height: 16px; background: var(--radio-yellow); }
.row { display: grid; grid-template-columns: 2fr 1fr auto; gap: 8px; font-size: 12px; padding: 2px 0; }
.row .k { color: var(--radio-yellow); }
.row .v { text-align: right; font-family: var(--mono); font-weight: bold; }
.row .u { color: var(--muted); }
.loading { color: var(--muted); font-size: 18px; text-align: center; padding: 80px 0; }
.badge { justify-self: end; color: #fff; font-weight: bold; font-size: 12px; padding: 2px 10px; border-radius: 10px; }
.lamp { display: inline-block; width: 8px; height: 8px; border-radius: 50%; margin-left: 3px; }
.hidden { display: none; }
svg text { fill: #ccc; font-size: 10px; text-anchor: middle; }
</style>
</head>
<body>
<header>
  <h1 id="site">FM Transmitter</h1>
  <nav id="nav">
    <button data-view="dashboard">Dashboard</button>
    <button data-view="designs">Meter designs</button>
  </nav>
</header>
<main>
  <section id="view-dashboard">
    <div id="loading" class="loading">Loading transmitter data...</div>
    <div id="telemetry" class="hidden">
      <div id="banner" class="banner"></div>
      <div class="grid2">
        <div class="panel" id="forward"></div>
        <div class="panel" id="reflected"></div>
      </div>
    </div>
    <div class="grid3" id="audio"></div>
    <div id="linear" class="grid2 hidden">
      <div class="panel" id="frequency"></div>
      <div class="panel" id="efficiency"></div>
    </div>
    <div class="grid2">
      <div>
        <div class="panel hidden" id="main-data"></div>
        <div class="panel" id="fm" style="margin-top:16px"></div>
      </div>
      <div>
        <div class="panel" id="temps"></div>
        <div class="panel" id="device" style="margin-top:16px"></div>
      </div>
    </div>
  </section>
  <section id="view-designs" class="hidden">
    <div class="grid2" id="gallery"></div>
  </section>
</main>
<script>
// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------
const $ = id => document.getElementById(id);

function esc(s) {
  return String(s).replace(/[&<>"]/g, c => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;' }[c]));
}

function labels(list) {
  return '<div class="labels">' + list.map(l => '<span>' + esc(l) + '</span>').join('') + '</div>';
}

function segmented(view) {
  const segs = view.segments.map(s =>
    '<div style="background:' + s.color + ';height:' + (s.tall ? '100%' : '60%') + '"></div>').join('');
  return '<h3>' + esc(view.title) + '</h3>' + labels(view.labels) +
    '<div class="segments">' + segs + '</div><div class="readout">' + esc(view.display) + '</div>';
}

function linear(view) {
  return '<h3>' + esc(view.title) + '</h3><div class="track"><div class="marker" style="left:calc(' +
    view.markerPercent + '% - 1px)"></div></div>' + labels(view.scale) +
    '<div class="readout">' + esc(view.display) + '</div>';
}

function bar(view) {
  return '<div class="row"><span class="k">' + esc(view.title) + '</span><span class="v">' + esc(view.display) +
    '</span><span></span></div><div class="track"><div class="fill" style="width:' + view.fillPercent +
    '%;background:' + view.color + '"></div></div>' + labels(view.labels);
}

function row(k, v, u) {
  return '<div class="row"><span class="k">' + esc(k) + '</span><span class="v">' + esc(v) +
    '</span><span class="u">' + esc(u || '') + '</span></div>';
}

function figure(k, f) {
  return '<div class="row"><span class="k">' + esc(k) + '</span><span class="v" style="color:' + f.color + '">' +
    esc(f.display) + '</span><span></span></div>';
}

function needle(view, w, h) {
  const ticks = view.ticks.map(t =>
    '<line x1="' + t.inner.x + '" y1="' + t.inner.y + '" x2="' + t.outer.x + '" y2="' + t.outer.y +
    '" stroke="#ccc" stroke-width="' + (t.major ? 2 : 1) + '"/>').join('');
  const marks = view.labels.map(l => '<text x="' + l.at.x + '" y="' + l.at.y + '">' + esc(l.text) + '</text>').join('');
  return '<h3>' + esc(view.title) + '</h3><svg viewBox="0 0 ' + w + ' ' + h + '" width="100%">' + ticks + marks +
    '<line x1="' + view.center.x + '" y1="' + view.center.y + '" x2="' + view.tip.x + '" y2="' + view.tip.y +
    '" stroke="#ff3030" stroke-width="3"/><circle cx="' + view.center.x + '" cy="' + view.center.y +
    '" r="5" fill="#ff3030"/></svg><div class="readout">' + esc(view.display) + '</div>';
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------
function render(d) {
  $('site').textContent = d.device.siteName;
  $('loading').classList.toggle('hidden', !d.loading);
  $('telemetry').classList.toggle('hidden', d.loading);
  $('linear').classList.toggle('hidden', d.loading);
  $('main-data').classList.toggle('hidden', d.loading);

  if (d.telemetry) {
    const t = d.telemetry;
    $('banner').textContent = t.banner.text;
    $('banner').style.background = t.banner.onAir ? 'var(--radio-green)' : 'var(--radio-gray)';
    $('forward').innerHTML = segmented(t.forwardPower);
    $('reflected').innerHTML = segmented(t.reflectedPower);
    $('frequency').innerHTML = linear(t.frequency);
    $('efficiency').innerHTML = linear(t.rfEfficiency);
    $('main-data').innerHTML = '<h3>Main data</h3>' + t.mainData.map(r => row(r.label, r.value, r.unit)).join('');
  }

  $('audio').innerHTML = d.audio.map(a => '<div class="panel">' + segmented(a) + '</div>').join('');
  $('temps').innerHTML = '<h3>Device Temperature Monitor</h3>' + d.temperatures.map(bar).join('');

  const fm = d.fm;
  $('fm').innerHTML = '<h3>FM Demodulation</h3>' +
    '<svg viewBox="0 0 300 64" width="100%"><line x1="0" y1="32" x2="300" y2="32" stroke="#333"/>' +
    '<polyline fill="none" stroke="#00ff00" stroke-width="1.5" points="' + fm.waveformPath + '"/></svg>' +
    figure('Modulation', fm.modulationDepth) + row('Carrier', fm.carrier) +
    figure('SNR', fm.snr) + figure('THD', fm.thd) + figure('Pilot', fm.pilot);

  const dev = d.device;
  const lamps = dev.sourceLamps.map(l => '<span class="lamp" title="' + esc(l.name) + '" style="background:' +
    l.color + '"></span>').join('');
  $('device').innerHTML = '<h3>Device Status</h3>' + row('Device Model', dev.model) +
    row('Firmware Version', dev.firmware) + row('Audio Software Version', dev.audioSoftware) +
    row('System Status', dev.status) +
    '<h3 style="margin-top:12px">Device Info</h3>' + row('Cooling Fan Speed', dev.fanRpm, 'RPM') +
    '<div class="track"><div class="fill" style="width:' + dev.fanRpmPercent + '%;background:#4ade80"></div></div>' +
    '<div class="row"><span class="k">Active Audio Source</span><span class="badge" style="background:' +
    dev.audioSourceColor + '">' + esc(dev.audioSource) + '</span><span>' + lamps + '</span></div>';
}

async function poll() {
  try {
    const res = await fetch('/api/dashboard');
    if (res.ok) render(await res.json());
  } catch (e) {
    // Keep the last frame; the next poll tries again.
  }
}

// ---------------------------------------------------------------------------
// Meter design gallery
// ---------------------------------------------------------------------------
async function loadDesigns() {
  const res = await fetch('/api/designs');
  if (!res.ok) return;
  const g = await res.json();
  const strip = g.stripChart;
  const bands = strip.bands.map(b => '<div style="width:' + b.widthPercent + '%;background:' +
    ({ green: '#00ff00', yellow: '#ffff00', red: '#ff0000' }[b.zone]) + ';opacity:.35"></div>').join('');
  $('gallery').innerHTML =
    '<div class="panel">' + needle(g.classicAnalog, 300, 200) + '</div>' +
    '<div class="panel">' + segmented(g.digitalBar) + '</div>' +
    '<div class="panel"><h3>' + esc(strip.title) + '</h3><div class="track" style="display:flex;height:24px">' + bands +
    '<div class="marker" style="left:' + strip.markerPercent + '%;height:28px"></div></div>' + labels(strip.labels) +
    '<div class="readout">' + esc(strip.display) + '</div></div>' +
    '<div class="panel">' + needle(g.edgewise, 300, 160) + '</div>' +
    '<div class="panel"><h3>' + esc(g.lcd.title) + '</h3><div class="readout" style="font-size:36px;color:#00ff00">' +
    esc(g.lcd.display) + '</div><div class="track"><div class="fill" style="width:' + g.lcd.fillPercent +
    '%;background:#00ff00"></div></div>' + labels(g.lcd.labels) + '</div>';
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------
$('nav').addEventListener('click', e => {
  const view = e.target.dataset && e.target.dataset.view;
  if (!view) return;
  $('view-dashboard').classList.toggle('hidden', view !== 'dashboard');
  $('view-designs').classList.toggle('hidden', view !== 'designs');
  if (view === 'designs') loadDesigns();
});

poll();
setInterval(poll, 1000);
</script>
</body>
</html>"##;
