//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Aria Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# Sections marked (live) are re-applied when this file is saved.

[animation]  # (live)
# blend_rate = 3.0       # 0.1-50 per second

[animation.emotions]
# neutral = "neutral"
# happy = "happy"
# sad = "sad"
# angry = "angry"
# surprised = "Surprised"

[blink]  # (live)
# enabled = true
# duration = 0.15        # 0.05-1.0 seconds per close/open cycle
# min_interval = 3.0     # 0.5-30 seconds
# max_interval = 5.0     # must be >= min_interval
# expressions = ["blink", "blinkLeft", "blinkRight"]

[lipsync]  # (live)
# enabled = true
# fft_size = 256         # power of two, 32-32768
# smoothing = 0.8        # 0.0-1.0
# min_decibels = -100.0
# max_decibels = -30.0
# threshold = 0.05       # 0.0-1.0
# curve = 1.0            # 0.1-5.0, 1.0 = linear
# blend_rate_multiplier = 5.0
# mouth_shapes = [
#   { keyword = "aa", gain = 0.8 },
#   { keyword = "oh", gain = 0.5 },
#   { keyword = "ou", gain = 0.35 },
#   { keyword = "ee", gain = 0.3 },
#   { keyword = "ih", gain = 0.25 },
# ]

[lipsync.jaw]
# enabled = true
# max_angle = 0.35       # radians

[gaze]  # (live)
# enabled = true
# ease_rate = 5.0
# distance = 2.0
# max_yaw = 0.5          # radians, 0-1.57
# max_pitch = 0.5

[gaze.camera]
# position = [0.0, 0.2, 2.8]
# look_at = [0.0, 0.2, 0.0]
# fov = 55.0             # degrees, 10-120

[idle]  # (live)
# enabled = true
# amplitude = 1.0        # 0 disables idle motion

[pose]  # (live)
# enabled = true
# mode = "snap"          # snap, smooth
# smooth_rate = 10.0
# upper_arm_angle = 1.2  # radians

[clips]
# crossfade = 0.5        # seconds

# [[clips.groups]]
# name = "greeting"
# triggers = ["hello", "hi ", "bye"]
# priority = 10
# candidates = [{ clip = "Wave", weight = 1.0 }]

[clips.emotions]
# neutral = ["Idle"]
# happy = ["Jump", "Clap"]
# sad = ["Sigh"]
# angry = ["Stomp"]
# surprised = ["Startle"]

[audio]
# output = "device"      # device, clock
# gain = 1.0             # 0.0-2.0
# autoplay_timeout = 5.0 # seconds to wait for a click after a blocked play
# simulate_autoplay_block = false

[characters]
# default = "test"

# [[characters.roster]]
# id = "test"
# rig = "assets/rigs/test.json"
# driver = "skeleton"    # skeleton, clips

# [[characters.roster]]
# id = "jinyoung"
# rig = "assets/rigs/jinyoung.toml"
# driver = "clips"

[service]
# mode = "endpoint"      # endpoint, openai
# endpoint_url = "http://localhost:3000/api/chat"
# base_url = "https://api.openai.com/v1"
# api_key_env = "OPENAI_API_KEY"
# chat_model = "gpt-4o-mini"
# tts_model = "tts-1"
# voice = "nova"
# timeout_secs = 30
# fallback_text = "Sorry, something went wrong. Please try again!"

[performance]
# frame_rate = 60        # 15-240
# frame_budget_ms = 16.0

[logging]
# level = "INFO"         # TRACE, DEBUG, INFO, WARNING, ERROR
# frame_summary_interval = 300
"##
    .to_string()
}
