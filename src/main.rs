fn main() {
    bevy_flyer::game::run();
}
