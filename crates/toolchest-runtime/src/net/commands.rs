//! Command sequence construction.
//!
//! Pure functions from a validated [`NetworkConfig`] and a
//! [`Platform`] tag to an ordered list of fully resolved shell command
//! strings. Execution order is the list order; nothing here touches the
//! OS.

use toolchest_core::NetworkConfig;

use crate::platform::Platform;

/// Commands that apply a static configuration.
///
/// Callers must validate the config first
/// ([`toolchest_core::validate_config`]); in particular the mask → prefix
/// conversion is only correct for the canonical contiguous masks.
#[must_use]
pub fn apply_sequence(config: &NetworkConfig, platform: Platform) -> Vec<String> {
    match platform {
        Platform::Windows => windows_apply(config),
        Platform::Posix => posix_apply(config),
    }
}

fn windows_apply(config: &NetworkConfig) -> Vec<String> {
    let interface = &config.interface;
    let mut commands = vec![match config.gateway() {
        Some(gateway) => format!(
            "netsh interface ip set address \"{interface}\" static {} {} {gateway}",
            config.address, config.netmask
        ),
        None => format!(
            "netsh interface ip set address \"{interface}\" static {} {}",
            config.address, config.netmask
        ),
    }];
    if let Some(dns1) = config.dns1() {
        commands.push(format!(
            "netsh interface ip set dns \"{interface}\" static {dns1} primary"
        ));
    }
    if let Some(dns2) = config.dns2() {
        commands.push(format!(
            "netsh interface ip add dns \"{interface}\" {dns2} index=2"
        ));
    }
    commands
}

fn posix_apply(config: &NetworkConfig) -> Vec<String> {
    let interface = posix_interface_name(&config.interface);
    let prefix = netmask_prefix_len(&config.netmask);
    let mut commands = vec![format!(
        "ip addr add {}/{prefix} dev {interface}",
        config.address
    )];
    if let Some(gateway) = config.gateway() {
        commands.push(format!("ip route add default via {gateway} dev {interface}"));
    }
    if let Some(dns1) = config.dns1() {
        commands.push(format!("echo 'nameserver {dns1}' > /etc/resolv.conf"));
        if let Some(dns2) = config.dns2() {
            commands.push(format!("echo 'nameserver {dns2}' >> /etc/resolv.conf"));
        }
    }
    commands.push(format!("ip link set {interface} up"));
    commands
}

/// Commands that hand the interface back to DHCP.
///
/// Re-applying DHCP to an interface that is already on DHCP succeeds; the
/// sequence is idempotent.
#[must_use]
pub fn reset_sequence(interface: &str, platform: Platform) -> Vec<String> {
    match platform {
        Platform::Windows => vec![
            format!("netsh interface ip set address \"{interface}\" dhcp"),
            format!("netsh interface ip set dns \"{interface}\" dhcp"),
        ],
        Platform::Posix => {
            let device = posix_interface_name(interface);
            vec![
                format!("dhclient -r {device}"),
                format!("dhclient {device}"),
            ]
        }
    }
}

/// Single command that brings an interface up.
#[must_use]
pub fn enable_sequence(interface: &str, platform: Platform) -> Vec<String> {
    match platform {
        Platform::Windows => vec![format!(
            "netsh interface set interface \"{interface}\" enable"
        )],
        Platform::Posix => vec![format!(
            "ip link set {} up",
            posix_interface_name(interface)
        )],
    }
}

/// Single command that takes an interface down.
#[must_use]
pub fn disable_sequence(interface: &str, platform: Platform) -> Vec<String> {
    match platform {
        Platform::Windows => vec![format!(
            "netsh interface set interface \"{interface}\" disable"
        )],
        Platform::Posix => vec![format!(
            "ip link set {} down",
            posix_interface_name(interface)
        )],
    }
}

/// Map a display name to a canonical POSIX device name.
///
/// Deliberately coarse, carried over as observed: names containing
/// "wireless", "wlan" or "wi-fi" (case-insensitive) map to `wlan0`,
/// everything else to `eth0`. Unreliable on hosts with predictable
/// interface names (`enp3s0`, `wlp2s0`); treat the result as a best
/// guess, not a resolution.
#[must_use]
pub fn posix_interface_name(display_name: &str) -> &'static str {
    let lowered = display_name.to_lowercase();
    if ["wireless", "wlan", "wi-fi"]
        .iter()
        .any(|tag| lowered.contains(tag))
    {
        "wlan0"
    } else {
        "eth0"
    }
}

/// Dotted-quad mask → CIDR prefix length, by summing octet popcounts.
/// Numerically correct only for contiguous masks.
fn netmask_prefix_len(netmask: &str) -> u32 {
    netmask
        .split('.')
        .filter_map(|octet| octet.parse::<u8>().ok())
        .map(u8::count_ones)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab_config() -> NetworkConfig {
        NetworkConfig::new("Ethernet", "192.168.1.50", "255.255.255.0")
            .with_gateway("192.168.1.1")
            .with_dns1("8.8.8.8")
    }

    #[test]
    fn netmask_prefix_covers_common_masks() {
        assert_eq!(netmask_prefix_len("255.255.255.0"), 24);
        assert_eq!(netmask_prefix_len("255.255.0.0"), 16);
        assert_eq!(netmask_prefix_len("255.255.255.255"), 32);
        assert_eq!(netmask_prefix_len("0.0.0.0"), 0);
    }

    #[test]
    fn windows_apply_without_dns2_is_exactly_two_commands() {
        let commands = apply_sequence(&lab_config(), Platform::Windows);
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0],
            "netsh interface ip set address \"Ethernet\" static 192.168.1.50 255.255.255.0 192.168.1.1"
        );
        assert_eq!(
            commands[1],
            "netsh interface ip set dns \"Ethernet\" static 8.8.8.8 primary"
        );
    }

    #[test]
    fn windows_apply_omits_gateway_when_absent() {
        let config = NetworkConfig::new("Ethernet", "10.0.0.5", "255.0.0.0");
        let commands = apply_sequence(&config, Platform::Windows);
        assert_eq!(
            commands,
            vec!["netsh interface ip set address \"Ethernet\" static 10.0.0.5 255.0.0.0"]
        );
    }

    #[test]
    fn windows_apply_adds_secondary_dns_at_index_two() {
        let config = lab_config().with_dns2("1.1.1.1");
        let commands = apply_sequence(&config, Platform::Windows);
        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[2],
            "netsh interface ip add dns \"Ethernet\" 1.1.1.1 index=2"
        );
    }

    #[test]
    fn posix_apply_emits_cidr_address_and_link_up() {
        let commands = apply_sequence(&lab_config(), Platform::Posix);
        assert_eq!(commands[0], "ip addr add 192.168.1.50/24 dev eth0");
        assert_eq!(
            commands[1],
            "ip route add default via 192.168.1.1 dev eth0"
        );
        assert_eq!(commands[2], "echo 'nameserver 8.8.8.8' > /etc/resolv.conf");
        assert_eq!(commands.last().unwrap(), "ip link set eth0 up");
    }

    #[test]
    fn posix_apply_sixteen_bit_mask_yields_slash_sixteen() {
        let config = NetworkConfig::new("Ethernet", "172.16.4.2", "255.255.0.0");
        let commands = apply_sequence(&config, Platform::Posix);
        assert_eq!(commands[0], "ip addr add 172.16.4.2/16 dev eth0");
    }

    #[test]
    fn posix_apply_appends_dns2_only_with_dns1() {
        let both = lab_config().with_dns2("1.1.1.1");
        let commands = apply_sequence(&both, Platform::Posix);
        assert!(commands.contains(&"echo 'nameserver 1.1.1.1' >> /etc/resolv.conf".to_owned()));

        // dns2 alone is not written on POSIX
        let orphan = NetworkConfig::new("Ethernet", "10.0.0.2", "255.0.0.0").with_dns2("1.1.1.1");
        let commands = apply_sequence(&orphan, Platform::Posix);
        assert!(!commands.iter().any(|c| c.contains("resolv.conf")));
    }

    #[test]
    fn reset_sequences_release_then_renew() {
        assert_eq!(
            reset_sequence("WLAN", Platform::Posix),
            vec!["dhclient -r wlan0", "dhclient wlan0"]
        );
        assert_eq!(
            reset_sequence("Ethernet", Platform::Windows),
            vec![
                "netsh interface ip set address \"Ethernet\" dhcp",
                "netsh interface ip set dns \"Ethernet\" dhcp",
            ]
        );
    }

    #[test]
    fn enable_and_disable_are_single_commands() {
        assert_eq!(
            enable_sequence("Ethernet", Platform::Posix),
            vec!["ip link set eth0 up"]
        );
        assert_eq!(
            disable_sequence("Ethernet", Platform::Windows),
            vec!["netsh interface set interface \"Ethernet\" disable"]
        );
    }

    #[test]
    fn interface_heuristic_matches_wireless_spellings() {
        assert_eq!(posix_interface_name("WLAN"), "wlan0");
        assert_eq!(posix_interface_name("Wi-Fi 2"), "wlan0");
        assert_eq!(posix_interface_name("Intel Wireless AC"), "wlan0");
        assert_eq!(posix_interface_name("Ethernet"), "eth0");
        assert_eq!(posix_interface_name("Local Area Connection"), "eth0");
    }
}
