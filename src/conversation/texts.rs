//! Fixed reply texts.

pub const SAY_MENU: &str = "For a command list please type & send-: menu?\nPlease include the question mark.";

pub const REMINDER_GREETING: &str =
    "Please save your email address, by typing & sending-: update email: example@emailprovider.com";

pub const COLD_GREETING: &str = "Hello there, I don't believe we've met before.";

pub const SMARTY_PANTS_GREETING: &str = "Hey there smarty pants, I see you've been here before.";

pub const NO_COMMAND: &str = "Err:NC, Sorry I couldn't identify a command in your message.";

pub const UPDATE_ORDER_HELP: &str = "update order 1:newAmount, 3:newAmount, 2:newAmount, ...
where 1, 2 or 3 is the item number as listed in the price list - item order not important.

For items with options please use the format-: 1x3, 3x1, 2x2, ...
The first number is the option's position in the item's option list and the second is your desired amount of that option.";

pub const FULL_ORDER_EXAMPLE: &str = "An order of:
12 grams of item 9,
3 of option 1, 2 of option 3 and 1 of option 2 of item 10 and
5 grams of item 6.

Should look like-: update order 9:12, 10: 1x3, 3x2, 2x1, 6:5";

pub const MAIN_MENU: &str = "Main Menu, command list:

fr.prlist? - Prints the price list.

menu? - Prints this menu.
userinfo? - Prints your user info.
currentorder? - Prints your current pending order.
checkoutnow? - Prints a payment link for your current basket.

update email: newEmail
update nickname: newNickname
update social: newSocial
update consent: newConsent";

/// Text shown above the price list.
pub fn price_list_preamble(shop_name: &str) -> String {
    format!(
        "Welcome to {},\n\nto save your order please type & send-: {}\n\n{}\n\nTo checkout type & send-: checkoutnow?",
        shop_name, UPDATE_ORDER_HELP, FULL_ORDER_EXAMPLE
    )
}

pub fn main_menu() -> String {
    format!("{}\n\n{}", MAIN_MENU, UPDATE_ORDER_HELP)
}
