use criterion::{black_box, criterion_group, criterion_main, Criterion};
use luaparse_options::{LuaVersion, ParseOptions};
use luaparse_parser::{parse, StreamingParser};

// A medium-size Lua module (~80 lines) with various constructs
const LUA_SOURCE: &str = r#"
-- Simple inventory module
local Inventory = {}
Inventory.__index = Inventory

local DEFAULT_CAPACITY = 16

function Inventory.new(owner, capacity)
    local self = setmetatable({}, Inventory)
    self.owner = owner
    self.capacity = capacity or DEFAULT_CAPACITY
    self.items = {}
    self.count = 0
    return self
end

function Inventory:add(name, amount)
    amount = amount or 1
    if self.count + amount > self.capacity then
        return false, "inventory full"
    end
    local slot = self.items[name]
    if slot == nil then
        slot = { name = name, amount = 0, tags = {} }
        self.items[name] = slot
    end
    slot.amount = slot.amount + amount
    self.count = self.count + amount
    return true
end

function Inventory:remove(name, amount)
    local slot = self.items[name]
    if not slot or slot.amount < amount then
        return false
    end
    slot.amount = slot.amount - amount
    self.count = self.count - amount
    if slot.amount == 0 then
        self.items[name] = nil
    end
    return true
end

function Inventory:names()
    local result = {}
    for name in pairs(self.items) do
        result[#result + 1] = name
    end
    table.sort(result, function(a, b) return a:lower() < b:lower() end)
    return result
end

local function describe(inventory)
    local parts = {}
    for i, name in ipairs(inventory:names()) do
        local slot = inventory.items[name]
        parts[i] = string.format("%s x%d", name, slot.amount)
    end
    return inventory.owner .. ": " .. table.concat(parts, ", ")
end

local function weight(inventory, weights)
    local total = 0
    for name, slot in pairs(inventory.items) do
        total = total + (weights[name] or 1) * slot.amount
    end
    local i = 10
    while i > 0 do
        i = i - 1
    end
    repeat
        total = total ^ 1
    until true
    return total
end

return { Inventory = Inventory, describe = describe, weight = weight }
"#;

fn bench_parse_lua(c: &mut Criterion) {
    let options = ParseOptions::new().with_version(LuaVersion::Lua53);
    c.bench_function("parse_lua_medium", |b| {
        b.iter(|| {
            let chunk = parse(black_box(LUA_SOURCE), &options);
            black_box(chunk)
        });
    });

    let detailed = options
        .clone()
        .with_locations(true)
        .with_ranges(true)
        .with_scopes(true);
    c.bench_function("parse_lua_medium_detailed", |b| {
        b.iter(|| {
            let chunk = parse(black_box(LUA_SOURCE), &detailed);
            black_box(chunk)
        });
    });

    c.bench_function("stream_lua_medium_by_line", |b| {
        b.iter(|| {
            let mut parser = StreamingParser::new(options.clone());
            for line in black_box(LUA_SOURCE).split_inclusive('\n') {
                let _ = parser.write(line);
            }
            black_box(parser.end(""))
        });
    });
}

criterion_group!(benches, bench_parse_lua);
criterion_main!(benches);
