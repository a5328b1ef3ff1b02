//! Contract interface definitions
//!
//! `sol!`-generated bindings used purely for call encoding and return
//! decoding. The contracts themselves are external collaborators; none of
//! their logic is reimplemented here.

use alloy::sol;

sol! {
    /// V3 swap router (Pancake/Uniswap periphery style).
    interface ISwapRouter {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        struct ExactInputParams {
            bytes path;
            address recipient;
            uint256 deadline;
            uint256 amountIn;
            uint256 amountOutMinimum;
        }

        function exactInputSingle(ExactInputSingleParams calldata params)
            external
            payable
            returns (uint256 amountOut);

        function exactInput(ExactInputParams calldata params)
            external
            payable
            returns (uint256 amountOut);

        function multicall(bytes[] calldata data) external payable returns (bytes[] memory results);

        function unwrapWETH9(uint256 amountMinimum, address recipient) external payable;

        function WETH9() external view returns (address);
    }

    /// V3 factory pool lookup.
    interface IV3Factory {
        function getPool(address tokenA, address tokenB, uint24 fee)
            external
            view
            returns (address pool);
    }

    /// Minimal ERC-20 surface: balances, transfers and router allowances.
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
    }

    /// Token launcher contract.
    interface ITokenLauncher {
        struct PoolConfig {
            int24 tick;
            address pairedToken;
            uint24 devBuyFee;
        }

        function deployToken(
            string calldata name,
            string calldata symbol,
            uint256 supply,
            uint24 fee,
            bytes32 salt,
            address deployer,
            uint256 socialId,
            string calldata image,
            string calldata socialHash,
            PoolConfig calldata poolConfig
        ) external payable returns (address tokenAddress, uint256 positionId);

        function claimRewards(address token) external;

        function setAdmin(address admin, bool isAdmin) external;

        function toggleAllowedPairedToken(address token, bool allowed) external;

        function updateLiquidityLocker(address newLocker) external;
    }

    /// Launcher util: deterministic salt/address preview for `deployToken`.
    interface ILauncherUtil {
        function generateSalt(
            address deployer,
            uint256 socialId,
            string calldata name,
            string calldata symbol,
            string calldata image,
            string calldata socialHash,
            uint256 supply,
            address pairedToken
        ) external view returns (bytes32 salt, address token);
    }
}
