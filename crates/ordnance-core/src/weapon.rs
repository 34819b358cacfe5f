//! Weapon records, the unit of ingestion and query.
//!
//! A weapon is one column of a stats sheet: a name, the category of the sheet
//! it came from, free-text notes, and a flat bag of optional string
//! attributes. Values are kept verbatim; nothing is parsed into numbers.

use serde::{Deserialize, Serialize};

use crate::identity::weapon_identity;

// ─── Record ──────────────────────────────────────────────────────────────────

/// One normalised weapon record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
  /// Content-derived identity; empty until assigned by the producer or by
  /// [`Weapon::ensure_identity`].
  #[serde(rename = "id", default, skip_serializing_if = "String::is_empty")]
  pub identity: String,
  pub name:     String,
  #[serde(default)]
  pub category: String,
  #[serde(rename = "additional_notes", default)]
  pub notes:    String,
  #[serde(flatten)]
  pub params:   WeaponParams,
}

impl Weapon {
  pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      category: category.into(),
      ..Self::default()
    }
  }

  /// The identity this record's content hashes to, regardless of what is
  /// currently stored in `identity`.
  pub fn computed_identity(&self) -> String {
    weapon_identity(&self.name, &self.category, &self.notes)
  }

  /// Assign the content identity if none is set yet, and return it.
  pub fn ensure_identity(&mut self) -> &str {
    if self.identity.is_empty() {
      self.identity = self.computed_identity();
    }
    &self.identity
  }
}

/// A name-search hit: just enough to link to the category listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
  pub name:     String,
  pub category: String,
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Sheet key of the row carrying both launch angles as `"horizontal / vertical"`.
pub const LAUNCH_ANGLES_KEY: &str = "Maximum launch angle (horizontally / vertically)";

/// Declares [`WeaponParams`] together with its column table.
///
/// Each entry is `field => "json_name", "Sheet key"`. The sheet key is the row
/// label text before its first `:`, e.g. `"Mass"` for `Mass: [kg]`.
macro_rules! weapon_params {
  ($($field:ident => $json:literal, $key:literal;)*) => {
    /// The optional attributes of a weapon, one per sheet row.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct WeaponParams {
      $(
        #[serde(rename = $json, skip_serializing_if = "Option::is_none")]
        pub $field: Option<String>,
      )*
    }

    impl WeaponParams {
      /// Every sheet key this table recognises, in declaration order.
      pub const COLUMN_KEYS: &'static [&'static str] = &[$($key),*];

      /// Store `value` in the field mapped to sheet key `key`.
      ///
      /// Returns `false` if the key is not part of the table.
      pub fn assign(&mut self, key: &str, value: String) -> bool {
        if key == LAUNCH_ANGLES_KEY {
          self.assign_launch_angles(&value);
          return true;
        }
        match key {
          $($key => self.$field = Some(value),)*
          _ => return false,
        }
        true
      }
    }
  };
}

weapon_params! {
  mass                                  => "mass_kg", "Mass";
  mass_end_booster_burn                 => "mass_end_booster_burn_kg", "Mass at end of booster burn";
  mass_end_sustainer_burn               => "mass_end_sustainer_burn_kg", "Mass at end of sustainer burn";
  caliber                               => "caliber_mm", "Calibre";
  length                                => "length_m", "Length";
  force_exerted_by_booster              => "force_exerted_by_booster_N", "Force exerted by booster";
  burn_time_of_booster                  => "burn_time_of_booster_s", "Burn time of booster";
  raw_acceleration_at_ignition          => "raw_acceleration_at_ignition_ms2", "Raw acceleration at ignition";
  specific_impulse_of_booster           => "specific_impulse_of_booster_s", "Specific impulse of booster";
  delta_v_of_booster                    => "delta_v_of_booster_ms", "ΔV of booster";
  booster_start_delay                   => "booster_start_delay_s", "Booster start delay";
  force_exerted_by_sustainer            => "force_exerted_by_sustainer_N", "Force exerted by sustainer";
  burn_time_of_sustainer                => "burn_time_of_sustainer_s", "Burn time of sustainer";
  specific_impulse_of_sustainer         => "specific_impulse_of_sustainer_s", "Specific impulse of sustainer";
  delta_v_of_sustainer                  => "delta_v_of_sustainer_ms", "ΔV of sustainer";
  total_delta_v                         => "total_delta_v_ms", "Total ΔV";
  explosive_mass                        => "explosive_mass_kg_tnt", "Explosive mass";
  warhead                               => "warhead", "Warhead";
  penetration                           => "penetration_mm", "Penetration";
  proximity_fuse                        => "proximity_fuse", "Proximity fuse";
  proximity_fuse_arming_distance        => "proximity_fuse_arming_distance", "Proximity fuse arming distance";
  proximity_fuse_arming_from_target     => "proximity_fuse_arming_distance_from_target", "Proximity fuse arming distance from target";
  proximity_fuse_range                  => "proximity_fuse_range_m", "Proximity fuse range";
  proximity_fuse_shell_detection        => "proximity_fuse_shell_detection", "Proximity fuse shell detection (80-200 mm)";
  proximity_fuse_minimum_altitude       => "proximity_fuse_minimum_atitude", "Proximity fuse minimum altitude";
  proximity_fuse_delay                  => "proximity_fuse_delay_s", "Proximity fuse delay";
  impact_fuse_sensitivity               => "impact_fuse_sensitivity_mm", "Impact fuse sensitivity";
  impact_fuse_delay                     => "impact_fuse_delay_m", "Impact fuse delay";
  guidance_type                         => "guidance_type", "Guidance type";
  guidance_start_delay                  => "guidance_start_delay_s", "Guidance start delay";
  guidance_duration                     => "guidance_duration_s", "Guidance duration";
  guidance_range                        => "guidance_range_km", "Guidance range";
  guidance_fov                          => "guidance_fov_deg", "Guidance FOV";
  guidance_max_lead                     => "guidance_max_lead_deg", "Guidance max lead";
  guidance_launch_sector                => "guidance_launch_sector_deg", "Guidance launch sector";
  aim_tracking_sensitivity              => "aim_tracking_sensitivity", "Aim tracking sensitivity";
  seeker_warm_up_time                   => "seeker_warm_up_time_s", "Seeker warm up time";
  seeker_search_duration                => "seeker_search_duration_s", "Seeker search duration";
  seeker_range                          => "seeker_range_km", "Seeker range";
  field_of_view                         => "field_of_view_deg", "Field of view";
  gimbal_limit                          => "gimbal_limit_deg", "Gimbal limit";
  track_rate                            => "track_rate_deg_sec", "Track rate";
  uncaged_seeker_before_launch          => "uncaged_seeker_before_launch", "Uncaged seeker before launch";
  max_lock_angle_before_launch          => "max_lock_angle_before_launch_deg", "Maximum lock angle before launch";
  min_angle_of_incidence_to_sun         => "min_angle_of_incidence_to_sun_deg", "Minimum angle of incidence of the seeker to the Sun for it to not capture the Sun";
  baseline_lock_range_rear              => "baseline_lock_range_rear_km", "Baseline lock range rear-aspect";
  baseline_lock_range_all               => "baseline_lock_range_all_km", "Baseline lock range all-aspect";
  baseline_lock_range_ground            => "baseline_lock_range_ground_km", "Baseline lock range (ground)";
  baseline_lock_range_target            => "baseline_lock_range_target_km", "Baseline lock range (target)";
  baseline_flare_detection              => "baseline_flare_detection_km", "Baseline flare detection range";
  baseline_ircm_detection               => "baseline_ircm_detection_km", "Baseline IRCM detection range";
  baseline_dircm_detection              => "baseline_dircm_detection_km", "Baseline DIRCM detection range";
  baseline_ldircm_detection             => "baseline_ldircm_detection_km", "Baseline LDIRCM detection";
  baseline_head_on_lock_range           => "baseline_head_on_lock_range_km", "Baseline head-on lock range against afterburning target";
  max_lock_range                        => "max_lock_range_km", "Maximum lock range (hard limit)";
  irccm                                 => "irccm", "IRCCM";
  irccm_type                            => "irccm_type", "IRCCM type";
  irccm_field_of_view                   => "irccm_field_of_view_deg", "IRCCM field of view";
  irccm_rejection_threshold             => "irccm_rejection_threshold", "IRCCM rejection threshold";
  irccm_reaction_time                   => "irccm_reaction_time_s", "IRCCM reaction time";
  min_target_size                       => "min_target_size_m", "Minimum target size";
  max_break_lock_time                   => "max_break_lock_time_s", "Maximum break lock time";
  can_be_slaved_to_radar                => "can_be_slaved_to_radar", "Can be slaved to radar";
  can_lock_after_launch                 => "can_lock_after_launch", "Can lock after launch";
  band                                  => "band", "Band";
  angular_speed_rejection               => "angular_speed_rejection_deg_s", "Angular speed rejection threshold";
  accel_rejection_range                 => "accel_rejection_m_s2", "Acceleration rejection threshold range";
  inertial_guidance_drift               => "inertial_guidance_drift_m_s", "Inertial guidance drift speed";
  datalink                              => "datalink", "Datalink";
  can_datalink_reconnect                => "can_datalink_reconnect", "Can datalink reconnect";
  sidelobe_attenuation                  => "sidelobe_attenuation", "Sidelobe attenuation";
  transmitter_power                     => "transmitter_power", "Transmitter power";
  transmitter_half_sensitivity          => "transmitter_half_sensitivity", "Transmitter angle of half sensitivity";
  transmitter_sidelobe_sensitivity      => "transmitter_sidelobe_sensitivity", "Transmitter sidelobe sensitivity";
  receiver_half_sensitivity             => "receiver_half_sensitivity", "Receiver angle of half sensitivity";
  receiver_sidelobe_sensitivity         => "receiver_sidelobe_sensitivity", "Receiver sidelobe sensitivity";
  distance_min                          => "distance_min_m", "Distance min";
  distance_max                          => "distance_max_km", "Distance max";
  distance_width                        => "distance_width_m", "Distance width";
  distance_ref_width                    => "distance_ref_width_m", "Distance ref width";
  distance_min_signal_gate              => "distance_min_signal_gate_m", "Distance min signal gate";
  distance_gate_search                  => "distance_gate_search_m", "Distance gate search";
  distance_gate_alpha                   => "distance_gate_alpha", "Distance gate alpha";
  distance_gate_beta                    => "distance_gate_beta", "Distance gate beta";
  doppler_speed_min                     => "doppler_speed_min_m_s", "Doppler speed min";
  doppler_speed_max                     => "doppler_speed_max_m_s", "Doppler speed max";
  doppler_speed_width                   => "doppler_speed_width_m_s", "Doppler speed width";
  doppler_speed_ref_width               => "doppler_speed_ref_width_m_s", "Doppler speed ref width";
  doppler_speed_min_gate                => "doppler_speed_min_gate_m_s", "Doppler speed min gate";
  doppler_speed_gate_search             => "doppler_speed_gate_search_m_s", "Doppler speed gate search";
  doppler_speed_gate_alpha              => "doppler_speed_gate_alpha", "Doppler speed gate alpha";
  doppler_speed_gate_beta               => "doppler_speed_gate_beta", "Doppler speed gate beta";
  proportional_nav_multiplier           => "proportional_nav_multiplier", "Proportional navigation multiplier";
  base_indicated_air_speed              => "base_air_speed_m_s", "Base indicated air speed";
  pid_proportional                      => "pid_proportional", "PID proportional term";
  pid_integral                          => "pid_integral", "PID integral term";
  pid_integral_limit                    => "pid_integral_limit", "PID integral term limit";
  pid_derivative                        => "pid_derivative", "PID derivative term";
  orienting_phase                       => "orienting_phase", "Orienting phase";
  orienting_start_delay                 => "orienting_start_delay", "Orienting start delay";
  orienting_control_time                => "orienting_control_time", "Orienting control time";
  orienting_elevation_addition          => "orienting_elevation_addition", "Orienting elevation addition";
  drag_coefficient_multiplier           => "drag_coefficient_multiplier", "Drag coefficient multiplier (this is not the only value affecting drag, just because it's higher than another missile's doesn't mean it actually has higher drag!!)";
  wing_area_multiplier                  => "wing_area_multiplier", "Wing area multiplier";
  start_speed                           => "start_speed", "Start speed";
  maximum_speed                         => "maximum_speed", "Maximum speed";
  minimum_range                         => "minimum_range", "Minimum range";
  flight_range_limit                    => "flight_range_limit", "Flight range limit";
  maximum_g_load                        => "maximum_g_load", "Maximum G-load";
  maximum_fin_angle_of_attack           => "maximum_fin_angle_of_attack", "Maximum fin angle of attack";
  maximum_fin_lateral_acceleration      => "maximum_fin_lateral_acceleration", "Maximum fin lateral acceleration";
  maximum_lateral_acceleration          => "maximum_lateral_acceleration", "Maximum lateral acceleration";
  maximum_aoa                           => "maximum_aoa", "Maximum AOA";
  thrust_vectoring                      => "thrust_vectoring", "Thrust vectoring";
  thrust_vectoring_angle                => "thrust_vectoring_angle", "Thrust vectoring angle";
  maximum_launch_angle_horizontal       => "maximum_launch_angle_horizontal", "Maximum launch angle (horizontally)";
  maximum_launch_angle_vertical         => "maximum_launch_angle_vertical", "Maximum launch angle (vertically)";
  maximum_axis_values                   => "maximum_axis_values", "Maximum axis values";
  statcard_speed                        => "statcard_speed", "Maximum statcard (useless) speed";
  statcard_launch_range                 => "statcard_launch_range", "Maximum statcard (useless) launch range";
  statcard_guaranteed_range             => "statcard_guaranteed_range", "Statcard (useless) guaranteed range";
  statcard_g_load                       => "statcard_g_load", "Statcard (useless) max G-load";
  flight_time_until_guidance_starts     => "flight_time_until_guidance_starts", "Flight time until guidance starts (delay)";
  flight_time_when_pull_limit_x         => "flight_time_when_pull_limit_x", "Flight time when pull limit reaches x%";
  flight_time_when_pull_limit_100       => "flight_time_when_pull_limit_100", "Flight time when pull limit reaches 100%";
  eta_to_impact_when_prop_multiplier    => "eta_to_impact_when_prop_multiplier", "ETA to impact when prop multiplier reaches x%";
  loft                                  => "loft", "Loft";
  loft_angle                            => "loft_angle", "Loft angle";
  target_elevation                      => "target_elevation", "Target elevation";
  maximum_target_angular_change         => "maximum_target_angular_change", "Maximum target angular change";
  has_tracer_in_tail                    => "has_tracer_in_tail", "Has a tracer in its tail";
  sea_skimming                          => "sea_skimming", "Sea skimming";
  skim_altitude                         => "skim_altitude", "Skim altitude";
  attack_altitude                       => "attack_altitude", "Attack altitude";
}

impl WeaponParams {
  /// Split a combined `"30 / 15"` cell into its two angles. A single value
  /// applies to both axes.
  fn assign_launch_angles(&mut self, value: &str) {
    let (horizontal, vertical) = value.split_once('/').unwrap_or((value, value));
    let part = |s: &str| Some(s.trim().to_owned()).filter(|s| !s.is_empty());
    self.maximum_launch_angle_horizontal = part(horizontal);
    self.maximum_launch_angle_vertical = part(vertical);
  }
}
